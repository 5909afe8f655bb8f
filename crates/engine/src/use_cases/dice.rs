//! Dice rolling use case.
//!
//! Parses notation, rolls with the configured convention and random source,
//! and records every roll in a shared history.

use std::sync::{Arc, Mutex, MutexGuard};

use runeforge_domain::{
    AdvantageRoll, AdvantageType, DicePool, RollHistory, RollRecord, RollResult,
    SuccessConvention,
};

use crate::error::EngineError;
use crate::infrastructure::ports::{ClockPort, RandomPort};

pub struct DiceService {
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
    convention: SuccessConvention,
    history: Mutex<RollHistory>,
}

impl DiceService {
    pub fn new(
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
        convention: SuccessConvention,
        history_limit: usize,
    ) -> Self {
        Self {
            random,
            clock,
            convention,
            history: Mutex::new(RollHistory::new(history_limit)),
        }
    }

    pub fn convention(&self) -> &SuccessConvention {
        &self.convention
    }

    /// Parse and roll a notation string
    pub fn roll(&self, notation: &str, context: Option<&str>) -> Result<RollResult, EngineError> {
        let pool = DicePool::parse(notation)?;
        Ok(self.roll_pool(&pool, context))
    }

    /// Roll an already-parsed pool
    pub fn roll_pool(&self, pool: &DicePool, context: Option<&str>) -> RollResult {
        let result = pool.roll_with(self.random.as_ref(), &self.convention);
        self.log_roll(&result, context);
        self.record(&result, context);
        result
    }

    /// Roll with advantage or disadvantage. Only the kept roll is recorded.
    pub fn roll_with_advantage(
        &self,
        notation: &str,
        advantage: AdvantageType,
        context: Option<&str>,
    ) -> Result<AdvantageRoll, EngineError> {
        let pool = DicePool::parse(notation)?;
        Ok(self.roll_pool_with_advantage(&pool, advantage, context))
    }

    /// Roll an already-parsed pool with advantage or disadvantage
    pub fn roll_pool_with_advantage(
        &self,
        pool: &DicePool,
        advantage: AdvantageType,
        context: Option<&str>,
    ) -> AdvantageRoll {
        let roll = pool.roll_with_advantage(self.random.as_ref(), advantage, &self.convention);

        if let Some(discarded) = &roll.discarded {
            tracing::debug!(
                notation = %pool,
                ?advantage,
                kept = roll.kept.net_successes(),
                discarded = discarded.net_successes(),
                "Rolled twice"
            );
        }
        self.log_roll(&roll.kept, context);
        self.record(&roll.kept, context);
        roll
    }

    /// Snapshot of the roll history
    pub fn history(&self) -> RollHistory {
        self.lock_history().clone()
    }

    fn record(&self, result: &RollResult, context: Option<&str>) {
        let record = RollRecord::from_roll(result, context.map(str::to_string), self.clock.now());
        self.lock_history().record(record);
    }

    fn lock_history(&self) -> MutexGuard<'_, RollHistory> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn log_roll(&self, result: &RollResult, context: Option<&str>) {
        tracing::debug!(
            notation = %result.pool(),
            context = context.unwrap_or("-"),
            raw_rolls = ?result.raw_rolls(),
            net_successes = result.net_successes(),
            "Rolled dice pool"
        );

        for (index, die) in result.dice().iter().enumerate() {
            if die.explosions() > 0 {
                tracing::debug!(
                    die = index,
                    faces = ?die.faces(),
                    explosions = die.explosions(),
                    "Die exploded"
                );
            }
        }

        if result.is_fumble() {
            tracing::info!(
                notation = %result.pool(),
                botches = result.botches(),
                "Fumble"
            );
        } else if result.is_critical_success() {
            tracing::info!(
                notation = %result.pool(),
                net_successes = result.net_successes(),
                "Critical success"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockClockPort;
    use crate::infrastructure::random::SeededRandom;
    use chrono::{TimeZone, Utc};
    use runeforge_domain::{DiceParseError, ScriptedRandom};

    fn service(faces: impl IntoIterator<Item = i32>) -> DiceService {
        let now = Utc.with_ymd_and_hms(2024, 5, 4, 18, 30, 0).unwrap();
        DiceService::new(
            Arc::new(ScriptedRandom::with_ints(faces)),
            Arc::new(FixedClock(now)),
            SuccessConvention::default(),
            20,
        )
    }

    #[test]
    fn test_roll_records_history() {
        let dice = service([9, 8, 2]);
        let result = dice.roll("3d10", Some("lockpicking")).expect("roll");
        assert_eq!(result.net_successes(), 2);

        let history = dice.history();
        assert_eq!(history.total_rolls(), 1);
        let last = history.last_roll().expect("recorded");
        assert_eq!(last.notation, "3d10");
        assert_eq!(last.context.as_deref(), Some("lockpicking"));
        assert_eq!(last.raw_rolls, vec![9, 8, 2]);
        assert_eq!(
            last.rolled_at,
            Utc.with_ymd_and_hms(2024, 5, 4, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_notation_is_not_recorded() {
        let dice = service([]);
        let err = dice.roll("3d20", None).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DiceParse(DiceParseError::UnsupportedFaces(20))
        ));
        assert_eq!(dice.history().total_rolls(), 0);
    }

    #[test]
    fn test_custom_convention() {
        let dice = DiceService::new(
            Arc::new(ScriptedRandom::with_ints([6, 5, 2])),
            Arc::new(FixedClock(Utc::now())),
            SuccessConvention::new(5, 2, 5),
            20,
        );
        let result = dice.roll("3d6", None).expect("roll");
        assert_eq!(result.successes(), 2);
        assert_eq!(result.botches(), 1);
        assert_eq!(result.net_successes(), 1);
    }

    #[test]
    fn test_advantage_records_only_kept_roll() {
        let dice = service([2, 3, 9, 10]);
        let roll = dice
            .roll_with_advantage("2d10", AdvantageType::Advantage, None)
            .expect("roll");
        assert_eq!(roll.kept.net_successes(), 2);
        assert_eq!(roll.discarded.map(|d| d.net_successes()), Some(0));

        let history = dice.history();
        assert_eq!(history.total_rolls(), 1);
        assert_eq!(history.last_roll().map(|r| r.net_successes), Some(2));
    }

    #[test]
    fn test_history_uses_clock_per_roll() {
        let mut clock = MockClockPort::new();
        clock.expect_now().times(2).returning(Utc::now);
        let dice = DiceService::new(
            Arc::new(SeededRandom::new(3)),
            Arc::new(clock),
            SuccessConvention::default(),
            20,
        );
        dice.roll("2d8", None).expect("roll");
        dice.roll("1d4+1", None).expect("roll");
        assert_eq!(dice.history().total_rolls(), 2);
    }

    #[test]
    fn test_history_limit_applies() {
        let dice = DiceService::new(
            Arc::new(SeededRandom::new(11)),
            Arc::new(FixedClock(Utc::now())),
            SuccessConvention::default(),
            3,
        );
        for _ in 0..5 {
            dice.roll("1d6", None).expect("roll");
        }
        let history = dice.history();
        assert_eq!(history.total_rolls(), 5);
        assert_eq!(history.recent_rolls().count(), 3);
    }
}
