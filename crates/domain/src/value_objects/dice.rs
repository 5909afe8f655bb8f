//! Dice pool value object and notation parsing
//!
//! Supports dice notation like "3d6+5", "1d10", "2d8-1" and the exploding
//! form "1d6!". An explicit explosion cap may follow the marker ("1d10!3");
//! it is only written back out when it differs from the default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Explosion cap used when the notation does not name one
pub const DEFAULT_MAX_EXPLOSIONS: u32 = 10;

/// Error when parsing dice notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The notation string is empty
    #[error("Empty dice notation")]
    Empty,
    /// No 'd' separator between count and faces
    #[error("Missing 'd' separator in '{0}'")]
    MissingSeparator(String),
    /// Count is not a number
    #[error("Invalid dice count: '{0}'")]
    InvalidCount(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Faces is not a number
    #[error("Invalid die faces: '{0}'")]
    InvalidFaces(String),
    /// Faces is a number but not a supported die
    #[error("Unsupported die: d{0}")]
    UnsupportedFaces(u32),
    /// Modifier is not a number
    #[error("Invalid modifier: '{0}'")]
    InvalidModifier(String),
    /// Explosion cap after '!' is not an unsigned number
    #[error("Invalid explosion cap: '{0}'")]
    InvalidExplosionCap(String),
}

/// Supported die types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiceType {
    D4,
    D6,
    D8,
    D10,
}

impl DiceType {
    /// Every supported die, smallest first
    pub const ALL: [DiceType; 4] = [Self::D4, Self::D6, Self::D8, Self::D10];

    /// Number of faces on this die
    pub fn faces(&self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
        }
    }

    /// Map a face count to a die type
    pub fn from_faces(faces: u32) -> Result<Self, DiceParseError> {
        match faces {
            4 => Ok(Self::D4),
            6 => Ok(Self::D6),
            8 => Ok(Self::D8),
            10 => Ok(Self::D10),
            other => Err(DiceParseError::UnsupportedFaces(other)),
        }
    }
}

impl fmt::Display for DiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.faces())
    }
}

/// A validated dice pool like "3d6+5" or "2d10!"
///
/// Pools are immutable once built. Non-exploding pools always carry the
/// default explosion cap, so two pools that roll identically compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DicePool {
    count: u32,
    dice_type: DiceType,
    modifier: i32,
    exploding: bool,
    max_explosions: u32,
}

impl DicePool {
    /// Create a non-exploding pool
    pub fn new(count: u32, dice_type: DiceType, modifier: i32) -> Result<Self, DiceParseError> {
        if count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        Ok(Self {
            count,
            dice_type,
            modifier,
            exploding: false,
            max_explosions: DEFAULT_MAX_EXPLOSIONS,
        })
    }

    /// Create an exploding pool with an explicit per-die explosion cap
    pub fn exploding(
        count: u32,
        dice_type: DiceType,
        modifier: i32,
        max_explosions: u32,
    ) -> Result<Self, DiceParseError> {
        let pool = Self::new(count, dice_type, modifier)?;
        Ok(Self {
            exploding: true,
            max_explosions,
            ..pool
        })
    }

    /// Parse dice notation like "3d6+5", "d10", "2d8-1", "1d6!"
    ///
    /// Supported formats:
    /// - "XdY" - Roll X dice with Y faces
    /// - "dY" - Roll 1 die with Y faces (shorthand)
    /// - "XdY+Z" / "XdY-Z" - Add or subtract Z after rolling
    /// - "...!" - Dice explode on their maximum face
    /// - "...!N" - Explode at most N times per die
    pub fn parse(notation: &str) -> Result<Self, DiceParseError> {
        let input = notation.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        // Strip the exploding marker (and its optional cap) first
        let (body, explosion_cap) = match input.find('!') {
            Some(bang) => {
                let cap_str = &input[bang + 1..];
                let cap = if cap_str.is_empty() {
                    DEFAULT_MAX_EXPLOSIONS
                } else if !is_digits(cap_str) {
                    return Err(DiceParseError::InvalidExplosionCap(cap_str.to_string()));
                } else {
                    cap_str
                        .parse::<u32>()
                        .map_err(|_| DiceParseError::InvalidExplosionCap(cap_str.to_string()))?
                };
                (&input[..bang], Some(cap))
            }
            None => (input.as_str(), None),
        };

        let d_pos = body
            .find('d')
            .ok_or_else(|| DiceParseError::MissingSeparator(input.clone()))?;

        let count_str = &body[..d_pos];
        let count: u32 = if count_str.is_empty() {
            1 // "d6" means "1d6"
        } else if !is_digits(count_str) {
            return Err(DiceParseError::InvalidCount(count_str.to_string()));
        } else {
            count_str
                .parse()
                .map_err(|_| DiceParseError::InvalidCount(count_str.to_string()))?
        };

        if count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }

        // The modifier sign is the first '+' or '-' after the faces digits
        let after_d = &body[d_pos + 1..];
        let faces_end = after_d
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after_d.len());
        let (faces_str, modifier_str) = after_d.split_at(faces_end);

        if faces_str.is_empty() {
            return Err(DiceParseError::InvalidFaces(after_d.to_string()));
        }
        let faces: u32 = faces_str
            .parse()
            .map_err(|_| DiceParseError::InvalidFaces(faces_str.to_string()))?;

        let modifier = parse_modifier(modifier_str)?;
        let dice_type = DiceType::from_faces(faces)?;

        match explosion_cap {
            Some(cap) => Self::exploding(count, dice_type, modifier, cap),
            None => Self::new(count, dice_type, modifier),
        }
    }

    /// Parse, discarding the reason on failure
    pub fn try_parse(notation: &str) -> Option<Self> {
        Self::parse(notation).ok()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn dice_type(&self) -> DiceType {
        self.dice_type
    }

    /// Faces per die
    pub fn faces(&self) -> u32 {
        self.dice_type.faces()
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn is_exploding(&self) -> bool {
        self.exploding
    }

    /// Extra rolls allowed per original die when exploding
    pub fn max_explosions(&self) -> u32 {
        self.max_explosions
    }

    /// Lowest possible total (every die shows 1)
    pub fn minimum(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    /// Highest possible total without explosions
    pub fn maximum(&self) -> i64 {
        i64::from(self.count) * i64::from(self.faces()) + i64::from(self.modifier)
    }

    /// Expected total without explosions
    pub fn average(&self) -> f64 {
        f64::from(self.count) * f64::from(self.faces() + 1) / 2.0 + f64::from(self.modifier)
    }

    /// Same dice with a different flat modifier
    pub fn with_modifier(self, modifier: i32) -> Self {
        Self { modifier, ..self }
    }
}

fn parse_modifier(modifier_str: &str) -> Result<i32, DiceParseError> {
    if modifier_str.is_empty() {
        return Ok(0);
    }
    let digits = match modifier_str.as_bytes()[0] {
        b'+' | b'-' => &modifier_str[1..],
        _ => return Err(DiceParseError::InvalidModifier(modifier_str.to_string())),
    };
    // Reject "+", "+-3" and "++3"; the sign is ours, the rest must be digits
    if !is_digits(digits) {
        return Err(DiceParseError::InvalidModifier(modifier_str.to_string()));
    }
    modifier_str
        .parse::<i32>()
        .map_err(|_| DiceParseError::InvalidModifier(modifier_str.to_string()))
}

/// Non-empty and ASCII digits only; `str::parse` alone would accept a sign
fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for DicePool {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.dice_type)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        if self.exploding {
            write!(f, "!")?;
            if self.max_explosions != DEFAULT_MAX_EXPLOSIONS {
                write!(f, "{}", self.max_explosions)?;
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for DicePool {
    type Error = DiceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DicePool> for String {
    fn from(pool: DicePool) -> Self {
        pool.to_string()
    }
}
