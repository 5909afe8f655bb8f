//! Unified error types for the domain layer
//!
//! Each component keeps its own precise error enum. `DomainError` is the common
//! type callers convert into when they do not care which component failed.

use thiserror::Error;

use crate::entities::{ExtendedCheckError, WeightedPoolError};
use crate::value_objects::{DiceParseError, ProbabilityTableError};

/// Unified error type for domain operations
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    /// Validation failed (e.g., a probability table that does not sum to 1)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected input values.
    ///
    /// # Example
    /// ```ignore
    /// if weight < 0.0 {
    ///     return Err(DomainError::validation("weight cannot be negative"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<ProbabilityTableError> for DomainError {
    fn from(err: ProbabilityTableError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<WeightedPoolError> for DomainError {
    fn from(err: WeightedPoolError) -> Self {
        match err {
            WeightedPoolError::ItemNotFound(id) => Self::not_found("WeightedItem", id),
            other => Self::Constraint(other.to_string()),
        }
    }
}

impl From<ExtendedCheckError> for DomainError {
    fn from(err: ExtendedCheckError) -> Self {
        match err {
            ExtendedCheckError::NotInProgress(_) => Self::Constraint(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("weight cannot be negative");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: weight cannot be negative");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("WeightedItem", "rusted-sword");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(
            err.to_string(),
            "Entity not found: WeightedItem with id rusted-sword"
        );
    }

    #[test]
    fn test_from_dice_parse_error() {
        let domain_err: DomainError = DiceParseError::Empty.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
        assert!(domain_err.to_string().contains("Empty dice notation"));
    }

    #[test]
    fn test_from_probability_table_error() {
        let domain_err: DomainError = ProbabilityTableError::SumOutOfTolerance(0.8).into();
        assert!(matches!(domain_err, DomainError::Validation(_)));
        assert!(domain_err.to_string().contains("0.8000"));
    }

    #[test]
    fn test_from_weighted_pool_error() {
        let missing: DomainError = WeightedPoolError::ItemNotFound("relic".to_string()).into();
        assert!(matches!(
            missing,
            DomainError::NotFound {
                entity_type: "WeightedItem",
                ..
            }
        ));

        let empty: DomainError = WeightedPoolError::NoSelectableItems.into();
        assert!(matches!(empty, DomainError::Constraint(_)));
    }
}
