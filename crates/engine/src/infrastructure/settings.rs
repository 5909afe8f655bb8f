//! Environment-backed dice settings.
//!
//! Every variable is optional. A missing variable falls back to its default, a
//! malformed one is an error so a typo never silently changes the odds.

use runeforge_domain::{SuccessConvention, MAX_RECENT_ROLLS};

pub const SUCCESS_THRESHOLD_VAR: &str = "RUNEFORGE_SUCCESS_THRESHOLD";
pub const BOTCH_FACE_VAR: &str = "RUNEFORGE_BOTCH_FACE";
pub const CRITICAL_THRESHOLD_VAR: &str = "RUNEFORGE_CRITICAL_THRESHOLD";
pub const RNG_SEED_VAR: &str = "RUNEFORGE_RNG_SEED";
pub const HISTORY_LIMIT_VAR: &str = "RUNEFORGE_HISTORY_LIMIT";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    NotAnInteger { key: &'static str, value: String },
    #[error("{key} must be at least 1")]
    Zero { key: &'static str },
}

/// Dice configuration for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceSettings {
    pub convention: SuccessConvention,
    /// Seed for a reproducible RNG; `None` uses the thread RNG
    pub rng_seed: Option<u64>,
    pub history_limit: usize,
}

impl Default for DiceSettings {
    fn default() -> Self {
        Self {
            convention: SuccessConvention::default(),
            rng_seed: None,
            history_limit: MAX_RECENT_ROLLS,
        }
    }
}

impl DiceSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SuccessConvention::default();

        let success_threshold = read_nonzero(&lookup, SUCCESS_THRESHOLD_VAR)?
            .unwrap_or(defaults.success_threshold);
        let botch_face = read_nonzero(&lookup, BOTCH_FACE_VAR)?.unwrap_or(defaults.botch_face);
        let critical_threshold = read_nonzero(&lookup, CRITICAL_THRESHOLD_VAR)?
            .unwrap_or(defaults.critical_threshold);

        if botch_face >= success_threshold {
            tracing::warn!(
                botch_face,
                success_threshold,
                "Botch face is scored as a success, so rolls can never botch"
            );
        }

        let rng_seed = read_u64(&lookup, RNG_SEED_VAR)?;

        let history_limit = match read_u64(&lookup, HISTORY_LIMIT_VAR)? {
            Some(0) => {
                tracing::warn!(
                    default = MAX_RECENT_ROLLS,
                    "{HISTORY_LIMIT_VAR} is 0, keeping the default history size"
                );
                MAX_RECENT_ROLLS
            }
            Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
            None => MAX_RECENT_ROLLS,
        };

        Ok(Self {
            convention: SuccessConvention::new(success_threshold, botch_face, critical_threshold),
            rng_seed,
            history_limit,
        })
    }
}

fn read_u64<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| SettingsError::NotAnInteger { key, value: raw })
}

fn read_nonzero<F>(lookup: &F, key: &'static str) -> Result<Option<u32>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    match read_u64(lookup, key)? {
        Some(0) => Err(SettingsError::Zero { key }),
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| SettingsError::NotAnInteger {
                key,
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}
