//! Use cases - Rolling, checks and loot built on the domain types.

pub mod dice;
pub mod loot;
pub mod skill_check;

pub use dice::DiceService;
pub use loot::LootService;
pub use skill_check::{SkillCheckResult, SkillCheckService};
