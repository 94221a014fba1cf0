//! Game engine for Apocalypse Nightmare, a menu-driven race against the clock.
//!
//! This crate provides:
//! - The town's location graph and the menus offered at each screen
//! - An Action/Effect rules system for deterministic game state
//! - The countdown clock, timed events and the endings
//! - Save/load persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use apocalypse_core::{GameConfig, GameSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GameSession::new(GameConfig::default().with_default_name("Riley"));
//!
//!     for line in session.menu().numbered() {
//!         println!("{line}");
//!     }
//!     let turn = session.choose(1)?;
//!     for line in &turn.narration {
//!         println!("{}", line.text);
//!     }
//!
//!     session.save("riley.json").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod ending;
pub mod headless;
pub mod locations;
pub mod menu;
pub mod persist;
pub mod rules;
pub mod session;
pub mod testing;
pub mod world;

// Primary public API
pub use config::{ConfigError, GameConfig, TuningConfig};
pub use ending::Ending;
pub use headless::{HeadlessConfig, HeadlessGame};
pub use menu::{Menu, MenuOption};
pub use persist::{PersistError, SavedGame};
pub use rules::{Action, Narration};
pub use session::{GameSession, SessionError, Turn};
pub use testing::TestHarness;
pub use world::{GameState, LocationId, NarrativeType, Screen};
