//! Opposed checks between two dice pool rolls

use serde::{Deserialize, Serialize};

use super::dice_roll::RollResult;

/// How an opposed check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContestedOutcome {
    InitiatorWins,
    DefenderWins,
    Tie,
    /// Initiator fumbled, defender wins by default
    InitiatorFumble,
    /// Defender fumbled, initiator wins by default
    DefenderFumble,
    BothFumble,
}

impl ContestedOutcome {
    pub fn initiator_won(&self) -> bool {
        matches!(self, Self::InitiatorWins | Self::DefenderFumble)
    }

    pub fn defender_won(&self) -> bool {
        matches!(self, Self::DefenderWins | Self::InitiatorFumble)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::InitiatorWins => "Initiator wins",
            Self::DefenderWins => "Defender wins",
            Self::Tie => "Tie",
            Self::InitiatorFumble => "Initiator fumbles",
            Self::DefenderFumble => "Defender fumbles",
            Self::BothFumble => "Both fumble",
        }
    }
}

/// Resolved opposed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestedCheck {
    initiator: RollResult,
    defender: RollResult,
    outcome: ContestedOutcome,
    margin: i64,
}

impl ContestedCheck {
    /// Compare two rolls. Fumbles are settled before net successes.
    pub fn resolve(initiator: RollResult, defender: RollResult) -> Self {
        let margin = i64::from(initiator.net_successes()) - i64::from(defender.net_successes());
        let outcome = match (initiator.is_fumble(), defender.is_fumble()) {
            (true, true) => ContestedOutcome::BothFumble,
            (true, false) => ContestedOutcome::InitiatorFumble,
            (false, true) => ContestedOutcome::DefenderFumble,
            (false, false) => match margin {
                m if m > 0 => ContestedOutcome::InitiatorWins,
                m if m < 0 => ContestedOutcome::DefenderWins,
                _ => ContestedOutcome::Tie,
            },
        };

        Self {
            initiator,
            defender,
            outcome,
            margin,
        }
    }

    pub fn initiator(&self) -> &RollResult {
        &self.initiator
    }

    pub fn defender(&self) -> &RollResult {
        &self.defender
    }

    pub fn outcome(&self) -> ContestedOutcome {
        self.outcome
    }

    /// Initiator net successes minus defender net successes
    pub fn margin(&self) -> i64 {
        self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::value_objects::dice::DicePool;

    fn roll(faces: &[i32]) -> RollResult {
        let pool = DicePool::parse(&format!("{}d10", faces.len())).expect("valid");
        pool.roll(&ScriptedRandom::with_ints(faces.iter().copied()))
    }

    #[test]
    fn test_higher_net_wins() {
        let check = ContestedCheck::resolve(roll(&[9, 9, 3]), roll(&[8, 4, 4]));
        assert_eq!(check.outcome(), ContestedOutcome::InitiatorWins);
        assert_eq!(check.margin(), 1);
        assert!(check.outcome().initiator_won());

        let check = ContestedCheck::resolve(roll(&[8, 4]), roll(&[10, 9, 8]));
        assert_eq!(check.outcome(), ContestedOutcome::DefenderWins);
        assert_eq!(check.margin(), -2);
        assert!(check.outcome().defender_won());
    }

    #[test]
    fn test_equal_net_is_tie() {
        let check = ContestedCheck::resolve(roll(&[9, 3]), roll(&[8, 5]));
        assert_eq!(check.outcome(), ContestedOutcome::Tie);
        assert_eq!(check.margin(), 0);
        assert!(!check.outcome().initiator_won());
        assert!(!check.outcome().defender_won());
    }

    #[test]
    fn test_fumble_priority() {
        let fumble = || roll(&[1, 4]);
        let clean = || roll(&[3, 4]);

        assert_eq!(
            ContestedCheck::resolve(fumble(), fumble()).outcome(),
            ContestedOutcome::BothFumble
        );
        assert_eq!(
            ContestedCheck::resolve(fumble(), clean()).outcome(),
            ContestedOutcome::InitiatorFumble
        );
        assert_eq!(
            ContestedCheck::resolve(clean(), fumble()).outcome(),
            ContestedOutcome::DefenderFumble
        );
    }

    #[test]
    fn test_fumble_beats_zero_net_comparison() {
        // Both sides have zero net, but only the defender botched
        let check = ContestedCheck::resolve(roll(&[2, 3]), roll(&[1, 5]));
        assert_eq!(check.margin(), 0);
        assert_eq!(check.outcome(), ContestedOutcome::DefenderFumble);
        assert!(check.outcome().initiator_won());
    }
}
