//! Outcome tiers for checks against a difficulty class
//!
//! Classification only needs net successes, the fumble flag and the DC, so it
//! works for rolls that did not come from a `DicePool` as well.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dice_roll::RollResult;

/// Margin at or above which a success becomes critical
pub const CRITICAL_MARGIN: i32 = 5;

/// Six ordered outcome tiers, worst first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillOutcome {
    CriticalFailure,
    Failure,
    MarginalSuccess,
    FullSuccess,
    ExceptionalSuccess,
    CriticalSuccess,
}

impl SkillOutcome {
    /// Every tier, worst first
    pub const ALL: [SkillOutcome; 6] = [
        Self::CriticalFailure,
        Self::Failure,
        Self::MarginalSuccess,
        Self::FullSuccess,
        Self::ExceptionalSuccess,
        Self::CriticalSuccess,
    ];

    /// Classify a non-fumble margin (net successes minus DC)
    pub fn from_margin(margin: i32) -> Self {
        match margin {
            m if m < 0 => Self::Failure,
            0 => Self::MarginalSuccess,
            1..=2 => Self::FullSuccess,
            3..=4 => Self::ExceptionalSuccess,
            _ => Self::CriticalSuccess,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CriticalFailure => "Critical Failure!",
            Self::Failure => "Failure",
            Self::MarginalSuccess => "Marginal Success",
            Self::FullSuccess => "Full Success",
            Self::ExceptionalSuccess => "Exceptional Success",
            Self::CriticalSuccess => "Critical Success!",
        }
    }

    pub fn is_success(&self) -> bool {
        *self >= Self::MarginalSuccess
    }

    /// Presentation category for narrative text
    pub fn descriptor_category(&self) -> DescriptorCategory {
        match self {
            Self::CriticalFailure => DescriptorCategory::Catastrophic,
            Self::Failure => DescriptorCategory::Failed,
            Self::MarginalSuccess => DescriptorCategory::Narrow,
            Self::FullSuccess => DescriptorCategory::Solid,
            Self::ExceptionalSuccess => DescriptorCategory::Impressive,
            Self::CriticalSuccess => DescriptorCategory::Legendary,
        }
    }
}

impl fmt::Display for SkillOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Narrative descriptor pools, one per outcome tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DescriptorCategory {
    Catastrophic,
    Failed,
    Narrow,
    Solid,
    Impressive,
    Legendary,
}

/// Classified outcome of a roll against a DC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeDetails {
    outcome_type: SkillOutcome,
    margin: i32,
    is_fumble: bool,
    is_critical: bool,
    descriptor_category: DescriptorCategory,
}

impl OutcomeDetails {
    /// Classify a dice pool roll against a DC
    pub fn from_roll(roll: &RollResult, dc: i32) -> Self {
        let net = i32::try_from(roll.net_successes()).unwrap_or(i32::MAX);
        Self::classify(net, roll.is_fumble(), roll.is_critical_success(), dc)
    }

    /// Classify from raw parts
    ///
    /// A fumble is always `CriticalFailure` whatever the margin. Otherwise the
    /// margin picks the tier, and the result is critical when the roll itself
    /// was critical or the margin reaches `CRITICAL_MARGIN`.
    pub fn classify(net_successes: i32, is_fumble: bool, is_critical_roll: bool, dc: i32) -> Self {
        let margin = net_successes.saturating_sub(dc);

        let (outcome_type, is_critical) = if is_fumble {
            (SkillOutcome::CriticalFailure, false)
        } else {
            (
                SkillOutcome::from_margin(margin),
                is_critical_roll || margin >= CRITICAL_MARGIN,
            )
        };

        Self {
            outcome_type,
            margin,
            is_fumble,
            is_critical,
            descriptor_category: outcome_type.descriptor_category(),
        }
    }

    pub fn outcome_type(&self) -> SkillOutcome {
        self.outcome_type
    }

    /// Net successes minus DC
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn is_fumble(&self) -> bool {
        self.is_fumble
    }

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    pub fn descriptor_category(&self) -> DescriptorCategory {
        self.descriptor_category
    }

    pub fn is_success(&self) -> bool {
        self.outcome_type.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use crate::value_objects::dice::DicePool;

    #[test]
    fn test_margin_two_is_full_success() {
        let details = OutcomeDetails::classify(7, false, false, 5);
        assert_eq!(details.margin(), 2);
        assert_eq!(details.outcome_type(), SkillOutcome::FullSuccess);
        assert_eq!(details.descriptor_category(), DescriptorCategory::Solid);
        assert!(!details.is_critical());
    }

    #[test]
    fn test_fumble_is_critical_failure() {
        let details = OutcomeDetails::classify(0, true, false, 1);
        assert_eq!(details.outcome_type(), SkillOutcome::CriticalFailure);
        assert_eq!(details.margin(), -1);
        assert!(details.is_fumble());
        assert!(!details.is_critical());
    }

    #[test]
    fn test_fumble_dominates_any_margin() {
        for dc in -10..=10 {
            let details = OutcomeDetails::classify(0, true, false, dc);
            assert_eq!(details.outcome_type(), SkillOutcome::CriticalFailure, "dc {dc}");
            assert_eq!(
                details.descriptor_category(),
                DescriptorCategory::Catastrophic
            );
        }
    }

    #[test]
    fn test_margin_bands() {
        let cases = [
            (-3, SkillOutcome::Failure),
            (-1, SkillOutcome::Failure),
            (0, SkillOutcome::MarginalSuccess),
            (1, SkillOutcome::FullSuccess),
            (2, SkillOutcome::FullSuccess),
            (3, SkillOutcome::ExceptionalSuccess),
            (4, SkillOutcome::ExceptionalSuccess),
            (5, SkillOutcome::CriticalSuccess),
            (9, SkillOutcome::CriticalSuccess),
        ];
        for (margin, expected) in cases {
            let details = OutcomeDetails::classify(10 + margin, false, false, 10);
            assert_eq!(details.outcome_type(), expected, "margin {margin}");
        }
    }

    #[test]
    fn test_critical_flag() {
        assert!(OutcomeDetails::classify(8, false, false, 3).is_critical());
        assert!(!OutcomeDetails::classify(7, false, false, 3).is_critical());
        let from_roll_flag = OutcomeDetails::classify(5, false, true, 5);
        assert!(from_roll_flag.is_critical());
        assert_eq!(from_roll_flag.outcome_type(), SkillOutcome::MarginalSuccess);
    }

    #[test]
    fn test_increasing_dc_never_improves_outcome() {
        for net in 0..12 {
            let mut previous = SkillOutcome::CriticalSuccess;
            for dc in -5..20 {
                let outcome = OutcomeDetails::classify(net, false, false, dc).outcome_type();
                assert!(outcome <= previous, "net {net} dc {dc}");
                previous = outcome;
            }
        }
    }

    #[test]
    fn test_tiers_are_totally_ordered() {
        for pair in SkillOutcome::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_descriptor_categories_are_distinct() {
        let mut categories: Vec<_> = SkillOutcome::ALL
            .iter()
            .map(SkillOutcome::descriptor_category)
            .collect();
        categories.dedup();
        assert_eq!(categories.len(), SkillOutcome::ALL.len());
    }

    #[test]
    fn test_from_roll() {
        let rng = ScriptedRandom::with_ints([10, 9, 8, 2]);
        let roll = DicePool::parse("4d10").expect("valid").roll(&rng);
        let details = OutcomeDetails::from_roll(&roll, 1);
        assert_eq!(details.margin(), 2);
        assert_eq!(details.outcome_type(), SkillOutcome::FullSuccess);
        assert!(details.is_success());
    }

    #[test]
    fn test_serializes_camel_case() {
        let details = OutcomeDetails::classify(3, false, false, 3);
        let json = serde_json::to_value(details).expect("serialize");
        assert_eq!(json["outcomeType"], "marginalSuccess");
        assert_eq!(json["descriptorCategory"], "narrow");
        assert_eq!(json["margin"], 0);
    }
}
