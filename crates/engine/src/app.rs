//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    ports::{ClockPort, RandomPort},
    random::{SeededRandom, ThreadRandom},
    settings::DiceSettings,
};
use crate::use_cases::{DiceService, LootService, SkillCheckService};

/// Main application state.
///
/// All services share one random source and one clock.
pub struct App {
    pub settings: DiceSettings,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub dice: Arc<DiceService>,
    pub skill_checks: SkillCheckService,
    pub loot: LootService,
}

impl App {
    /// Wire services from settings, picking the RNG from the configured seed
    pub fn new(settings: DiceSettings) -> Self {
        let random: Arc<dyn RandomPort> = match settings.rng_seed {
            Some(seed) => {
                tracing::info!(seed, "Using seeded RNG");
                Arc::new(SeededRandom::new(seed))
            }
            None => Arc::new(ThreadRandom::new()),
        };
        Self::with_ports(settings, random, Arc::new(SystemClock::new()))
    }

    pub fn with_ports(
        settings: DiceSettings,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let dice = Arc::new(DiceService::new(
            random.clone(),
            clock,
            settings.convention,
            settings.history_limit,
        ));

        let use_cases = UseCases {
            skill_checks: SkillCheckService::new(dice.clone()),
            loot: LootService::new(random),
            dice,
        };

        Self {
            settings,
            use_cases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::Utc;
    use runeforge_domain::ScriptedRandom;

    #[test]
    fn test_seeded_apps_roll_identically() {
        let settings = DiceSettings {
            rng_seed: Some(2024),
            ..DiceSettings::default()
        };
        let a = App::new(settings.clone());
        let b = App::new(settings);

        for _ in 0..10 {
            let left = a.use_cases.dice.roll("5d10!", None).expect("roll");
            let right = b.use_cases.dice.roll("5d10!", None).expect("roll");
            assert_eq!(left.raw_rolls(), right.raw_rolls());
        }
    }

    #[test]
    fn test_skill_checks_share_dice_history() {
        let app = App::with_ports(
            DiceSettings::default(),
            Arc::new(ScriptedRandom::with_ints([9, 9])),
            Arc::new(FixedClock(Utc::now())),
        );
        app.use_cases
            .skill_checks
            .check("2d10", 1, Some("parry"))
            .expect("check");
        let history = app.use_cases.dice.history();
        assert_eq!(history.total_rolls(), 1);
        assert_eq!(
            history.last_roll().and_then(|r| r.context.clone()).as_deref(),
            Some("parry")
        );
    }
}
