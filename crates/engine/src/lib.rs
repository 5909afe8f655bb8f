//! Runeforge Engine library.
//!
//! ## Structure
//!
//! - `use_cases/` - Dice, skill check and loot services
//! - `infrastructure/` - Clock and random adapters, environment settings
//! - `app` - Application composition

pub mod app;
pub mod error;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use error::EngineError;
