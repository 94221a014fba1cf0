//! Headless game interface for programmatic use.
//!
//! This module provides a simplified interface for running the game without
//! a TUI. It's designed for:
//! - Automated playthroughs in tests
//! - Agents and scripts driving the menus by number
//! - Reproducible runs with a fixed seed
//!
//! # Example
//!
//! ```ignore
//! use apocalypse_core::headless::{HeadlessConfig, HeadlessGame};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = HeadlessGame::new(HeadlessConfig::quick_start("Riley").with_seed(1));
//!
//!     for line in game.menu_lines() {
//!         println!("{line}");
//!     }
//!     let response = game.send("1")?;
//!     println!("{}", response.narrative);
//!
//!     game.save("riley.json").await?;
//!     Ok(())
//! }
//! ```

use crate::config::GameConfig;
use crate::ending::Ending;
use crate::session::{GameSession, SessionError};
use crate::world::{Item, LocationId};
use std::path::Path;

/// Configuration for a headless game session.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Protagonist name.
    pub name: String,
    pub game: GameConfig,
}

impl HeadlessConfig {
    /// Default tuning, a 24 hour day and an unseeded RNG.
    pub fn quick_start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            game: GameConfig::default(),
        }
    }

    /// Use an existing configuration.
    pub fn from_config(name: impl Into<String>, game: GameConfig) -> Self {
        Self {
            name: name.into(),
            game,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.game = self.game.with_seed(seed);
        self
    }

    pub fn with_starting_hours(mut self, hours: u32) -> Self {
        self.game = self.game.with_starting_hours(hours);
        self
    }
}

/// A simplified response from the game.
#[derive(Debug, Clone)]
pub struct GameResponse {
    /// Narration for the turn, one line per entry.
    pub narrative: String,
    pub location: LocationId,
    /// Clock display, `H:MM`.
    pub time_left: String,
    pub ending: Option<Ending>,
    pub quit: bool,
}

/// A game that can be controlled programmatically.
///
/// This wraps `GameSession` with a line-oriented interface for automated use.
pub struct HeadlessGame {
    session: GameSession,
    /// Transcript of all exchanges.
    transcript: Vec<TranscriptEntry>,
}

/// An entry in the game transcript.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    /// What was typed.
    pub input: String,
    /// The option label it selected.
    pub choice: String,
    pub narrative: String,
    pub turn: u32,
}

impl HeadlessGame {
    pub fn new(config: HeadlessConfig) -> Self {
        Self::from_session(GameSession::new(config.game.with_default_name(config.name)))
    }

    pub fn from_session(session: GameSession) -> Self {
        Self {
            session,
            transcript: Vec::new(),
        }
    }

    /// Load a saved game from a file.
    pub async fn load(config: GameConfig, path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let session = GameSession::load(config, path).await?;
        Ok(Self::from_session(session))
    }

    /// Send a menu number and get the turn's outcome.
    pub fn send(&mut self, input: &str) -> Result<GameResponse, SessionError> {
        let turn = self.session.choose_input(input)?;
        let narrative = turn
            .narration
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        self.transcript.push(TranscriptEntry {
            input: input.trim().to_string(),
            choice: turn.label,
            narrative: narrative.clone(),
            turn: turn.turn,
        });

        Ok(GameResponse {
            narrative,
            location: self.session.state().location,
            time_left: self.session.state().clock.display(),
            ending: turn.ending,
            quit: turn.quit,
        })
    }

    /// Select the first option whose label contains `needle`, ignoring case.
    pub fn send_label(&mut self, needle: &str) -> Result<GameResponse, SessionError> {
        let needle = needle.to_lowercase();
        let menu = self.session.menu();
        let index = menu
            .options
            .iter()
            .position(|o| o.label.to_lowercase().contains(&needle))
            .ok_or_else(|| SessionError::InvalidChoice {
                input: needle.clone(),
                max: menu.len(),
            })?;
        self.send(&(index + 1).to_string())
    }

    /// Save the current game to a file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        self.session.save(path).await
    }

    // ========================================================================
    // Game State Queries
    // ========================================================================

    pub fn protagonist_name(&self) -> &str {
        &self.session.state().protagonist_name
    }

    pub fn current_location(&self) -> LocationId {
        self.session.state().location
    }

    pub fn minutes_remaining(&self) -> u32 {
        self.session.state().time_remaining()
    }

    pub fn has_item(&self, item: Item) -> bool {
        self.session.state().has_item(item)
    }

    pub fn ending(&self) -> Option<Ending> {
        self.session.ending()
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    /// The current menu as title, prompt and numbered option lines.
    pub fn menu_lines(&self) -> Vec<String> {
        let menu = self.session.menu();
        let mut lines = vec![format!("--- {} ---", menu.title)];
        lines.extend(menu.prompt.iter().cloned());
        lines.extend(menu.numbered());
        lines
    }

    /// Get the transcript of all exchanges.
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn last_response(&self) -> Option<&str> {
        self.transcript.last().map(|e| e.narrative.as_str())
    }

    /// Get the underlying session for advanced use.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Get mutable access to the underlying session.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_start_config() {
        let config = HeadlessConfig::quick_start("Riley")
            .with_seed(3)
            .with_starting_hours(12);
        assert_eq!(config.name, "Riley");
        assert_eq!(config.game.game.seed, Some(3));
        assert_eq!(config.game.game.starting_hours, 12);
    }

    #[test]
    fn test_send_records_transcript() {
        let mut game = HeadlessGame::new(HeadlessConfig::quick_start("Riley").with_seed(1));
        assert_eq!(game.protagonist_name(), "Riley");

        let response = game.send_label("go to town").unwrap();
        assert_eq!(response.location, LocationId::TownSquare);
        assert_eq!(game.transcript().len(), 1);
        assert_eq!(game.transcript()[0].turn, 1);
        assert_eq!(game.transcript()[0].choice, "Go to town");
    }

    #[test]
    fn test_bad_input_is_not_recorded() {
        let mut game = HeadlessGame::new(HeadlessConfig::quick_start("Riley"));
        assert!(game.send("nope").is_err());
        assert!(game.send_label("fly to the moon").is_err());
        assert!(game.transcript().is_empty());
        assert!(game.menu_lines()[0].contains("Bedroom"));
    }

    #[test]
    fn test_menu_lines_show_prompt_then_options() {
        let mut game = HeadlessGame::new(HeadlessConfig::quick_start("Riley"));
        game.send_label("use computer").unwrap();
        let menu = game.session().menu();

        let lines = game.menu_lines();
        assert_eq!(lines[0], "--- Computer ---");
        assert_eq!(lines[1], menu.prompt[0]);
        assert_eq!(lines[1 + menu.prompt.len()], "1. ".to_string() + &menu.options[0].label);
        assert_eq!(lines.len(), 1 + menu.prompt.len() + menu.len());
        assert_eq!(game.menu_lines(), lines);
    }
}
