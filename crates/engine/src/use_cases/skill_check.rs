//! Skill check use cases: a roll against a DC, opposed rolls, and
//! multi-round extended checks.

use std::sync::Arc;

use serde::Serialize;

use runeforge_domain::{
    AdvantageType, ContestedCheck, DicePool, ExtendedCheck, ExtendedCheckError,
    ExtendedCheckStatus, OutcomeDetails, RollResult, DEFAULT_MAX_ROUNDS,
};

use crate::error::EngineError;
use crate::use_cases::dice::DiceService;

/// A roll and how it fared against the DC
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheckResult {
    pub roll: RollResult,
    pub dc: i32,
    pub outcome: OutcomeDetails,
}

pub struct SkillCheckService {
    dice: Arc<DiceService>,
}

impl SkillCheckService {
    pub fn new(dice: Arc<DiceService>) -> Self {
        Self { dice }
    }

    /// Roll `notation` against `dc`
    pub fn check(
        &self,
        notation: &str,
        dc: i32,
        context: Option<&str>,
    ) -> Result<SkillCheckResult, EngineError> {
        self.check_with_advantage(notation, dc, AdvantageType::Normal, context)
    }

    pub fn check_with_advantage(
        &self,
        notation: &str,
        dc: i32,
        advantage: AdvantageType,
        context: Option<&str>,
    ) -> Result<SkillCheckResult, EngineError> {
        let roll = self
            .dice
            .roll_with_advantage(notation, advantage, context)?
            .kept;
        let outcome = OutcomeDetails::from_roll(&roll, dc);

        tracing::info!(
            notation = %roll.pool(),
            dc,
            margin = outcome.margin(),
            outcome = %outcome.outcome_type(),
            "Skill check resolved"
        );

        Ok(SkillCheckResult { roll, dc, outcome })
    }

    /// Opposed roll between an initiator and a defender
    ///
    /// Both notations are parsed before either side rolls, so a bad defender
    /// pool leaves the history untouched.
    pub fn contested(
        &self,
        initiator_notation: &str,
        defender_notation: &str,
        context: Option<&str>,
    ) -> Result<ContestedCheck, EngineError> {
        let initiator_pool = DicePool::parse(initiator_notation)?;
        let defender_pool = DicePool::parse(defender_notation)?;
        let initiator = self.dice.roll_pool(&initiator_pool, context);
        let defender = self.dice.roll_pool(&defender_pool, context);
        let check = ContestedCheck::resolve(initiator, defender);

        tracing::info!(
            initiator = check.initiator().net_successes(),
            defender = check.defender().net_successes(),
            margin = check.margin(),
            outcome = check.outcome().display_name(),
            "Contested check resolved"
        );

        Ok(check)
    }

    /// Begin a multi-round check; `max_rounds` defaults to [`DEFAULT_MAX_ROUNDS`]
    pub fn start_extended(
        &self,
        notation: &str,
        target_successes: u32,
        max_rounds: Option<u32>,
    ) -> Result<ExtendedCheck, EngineError> {
        let pool = DicePool::parse(notation)?;
        let check =
            ExtendedCheck::new(pool, target_successes, max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS))?;

        tracing::info!(
            check_id = %check.id(),
            notation = %pool,
            target = check.target_successes(),
            max_rounds = check.max_rounds(),
            "Extended check started"
        );

        Ok(check)
    }

    /// Roll one round of an extended check and fold it into the running total
    pub fn extended_round(
        &self,
        check: &mut ExtendedCheck,
        advantage: AdvantageType,
        context: Option<&str>,
    ) -> Result<RollResult, EngineError> {
        if !check.is_active() {
            return Err(ExtendedCheckError::NotInProgress(check.status()).into());
        }

        let roll = self
            .dice
            .roll_pool_with_advantage(check.pool(), advantage, context)
            .kept;
        let status = check.process_round(&roll)?;

        tracing::info!(
            check_id = %check.id(),
            round = check.rounds_completed(),
            net_successes = roll.net_successes(),
            fumble = roll.is_fumble(),
            accumulated = check.accumulated_successes(),
            target = check.target_successes(),
            status = %status,
            "Extended check round"
        );
        if status == ExtendedCheckStatus::CatastrophicFailure {
            tracing::warn!(
                check_id = %check.id(),
                fumbles = check.consecutive_fumbles(),
                "Extended check ended in catastrophic failure"
            );
        }

        Ok(roll)
    }

    pub fn abandon_extended(&self, check: &mut ExtendedCheck) -> Result<(), EngineError> {
        check.abandon()?;
        tracing::info!(
            check_id = %check.id(),
            accumulated = check.accumulated_successes(),
            target = check.target_successes(),
            rounds = check.rounds_completed(),
            "Extended check abandoned"
        );
        Ok(())
    }
}
