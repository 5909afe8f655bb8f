//! Engine error type.

use runeforge_domain::{
    DiceParseError, DomainError, ExtendedCheckError, ProbabilityTableError, WeightedPoolError,
};

use crate::infrastructure::settings::SettingsError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Dice parse error: {0}")]
    DiceParse(#[from] DiceParseError),
    #[error("Invalid drop table: {0}")]
    DropTable(#[from] ProbabilityTableError),
    #[error("Weighted pool error: {0}")]
    WeightedPool(#[from] WeightedPoolError),
    #[error("Extended check error: {0}")]
    ExtendedCheck(#[from] ExtendedCheckError),
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    /// Collapse into the unified domain error, e.g. for callers that only
    /// speak `DomainError`
    pub fn into_domain(self) -> DomainError {
        match self {
            Self::DiceParse(e) => e.into(),
            Self::DropTable(e) => e.into(),
            Self::WeightedPool(e) => e.into(),
            Self::ExtendedCheck(e) => e.into(),
            Self::Settings(e) => DomainError::validation(e.to_string()),
            Self::Domain(e) => e,
        }
    }
}
