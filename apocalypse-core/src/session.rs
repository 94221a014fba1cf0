//! GameSession - the primary public API for playing.
//!
//! Wraps the game state, the rules engine and the RNG behind a turn-based
//! interface: ask for the [`Menu`], pick an option with [`GameSession::choose`],
//! read back the [`Turn`]. Front ends never touch the rules directly.

use crate::config::{ConfigError, GameConfig};
use crate::ending::{check_arrival, Ending};
use crate::menu::{build_menu, Menu};
use crate::persist::{self, PersistError, SavedGame};
use crate::rules::{apply_effects, Action, Effect, Narration, RulesEngine};
use crate::world::{GameState, NarrativeType, Screen};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid choice '{input}': enter a number from 1 to {max}")]
    InvalidChoice { input: String, max: usize },

    #[error("The game is over")]
    GameOver,

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The outcome of one menu choice.
#[derive(Debug, Clone)]
pub struct Turn {
    pub turn: u32,
    pub label: String,
    pub action: Action,
    pub narration: Vec<Narration>,
    pub effects: Vec<Effect>,
    /// Set if this turn decided the game.
    pub ending: Option<Ending>,
    pub quit: bool,
}

/// The opening vision.
pub fn intro() -> Vec<Narration> {
    [
        "A blinding flash, a deafening roar... and then, nothing but dust.",
        "It was clear. Your town was going to be destroyed.",
        "You rub your eyes, heart pounding. Was it real? It felt so real.",
        "You look around your familiar bedroom, the morning sun streaming in.",
        "The peace feels like a lie.",
    ]
    .into_iter()
    .map(|line| Narration::new(NarrativeType::Narration, line))
    .collect()
}

/// A single playthrough.
pub struct GameSession {
    config: GameConfig,
    engine: RulesEngine,
    state: GameState,
    rng: Box<dyn RngCore + Send>,
    quit: bool,
}

impl GameSession {
    /// Start a fresh game using the config's default name and seed.
    pub fn new(config: GameConfig) -> Self {
        let rng = seeded_rng(&config);
        let state = fresh_state(&config, config.game.default_name.clone());
        tracing::info!(
            session = %state.session_id,
            name = %state.protagonist_name,
            hours = config.game.starting_hours,
            "new game"
        );
        Self {
            engine: RulesEngine::new(config.tuning.clone()),
            config,
            state,
            rng,
            quit: false,
        }
    }

    /// Resume from a saved state.
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        tracing::info!(
            session = %state.session_id,
            name = %state.protagonist_name,
            turn = state.turn,
            minutes_left = state.time_remaining(),
            "resumed game"
        );
        let mut session = Self {
            engine: RulesEngine::new(config.tuning.clone()),
            rng: seeded_rng(&config),
            config,
            state,
            quit: false,
        };
        session.settle();
        session
    }

    /// Replace the RNG, e.g. with a deterministic one for tests.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Load a saved game.
    pub async fn load(config: GameConfig, path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let saved = SavedGame::load_json(path).await?;
        Ok(Self::from_state(config, saved.state))
    }

    /// Save the current game.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        SavedGame::new(self.state.clone()).save_json(path).await?;
        Ok(())
    }

    /// Where quick saves for this protagonist go.
    pub fn auto_save_path(&self) -> PathBuf {
        persist::auto_save_path(&self.config.saves.directory, &self.state.protagonist_name)
    }

    /// The menu for the current screen. Empty once the game is over.
    pub fn menu(&self) -> Menu {
        let mut menu = build_menu(&self.state, self.engine.tuning());
        if self.is_over() {
            menu.options.clear();
        }
        menu
    }

    /// Pick a 1-based menu option.
    pub fn choose(&mut self, choice: usize) -> Result<Turn, SessionError> {
        if self.is_over() {
            return Err(SessionError::GameOver);
        }
        let menu = self.menu();
        let option = menu
            .option(choice)
            .cloned()
            .ok_or_else(|| SessionError::InvalidChoice {
                input: choice.to_string(),
                max: menu.len(),
            })?;

        self.state.turn += 1;
        self.state
            .add_narrative(option.label.clone(), NarrativeType::PlayerChoice);

        let resolution = self
            .engine
            .resolve(&self.state, option.action, &mut *self.rng);
        tracing::debug!(
            turn = self.state.turn,
            action = ?option.action,
            effects = resolution.effects.len(),
            "resolved action"
        );

        let mut narration = resolution.narrative;
        narration.extend(apply_effects(&mut self.state, &resolution.effects));

        let quit = resolution.effects.contains(&Effect::QuitRequested);
        if quit {
            tracing::info!(turn = self.state.turn, "player quit");
            self.quit = true;
        }

        // No ending was recorded before this turn, so any ending now is new.
        if self.state.ending.is_none() {
            self.check_arrival();
        }
        let ending = self.state.ending;

        if let Some(ending) = ending {
            narration.extend(ending_narration(ending));
            tracing::info!(turn = self.state.turn, %ending, "game ended");
        }

        for line in &narration {
            self.state.add_narrative(line.text.clone(), line.kind);
        }

        Ok(Turn {
            turn: self.state.turn,
            label: option.label,
            action: option.action,
            narration,
            effects: resolution.effects,
            ending,
            quit,
        })
    }

    /// Parse a line of player input and choose it.
    pub fn choose_input(&mut self, input: &str) -> Result<Turn, SessionError> {
        let trimmed = input.trim();
        match trimmed.parse::<usize>() {
            Ok(n) => self.choose(n),
            Err(_) => Err(SessionError::InvalidChoice {
                input: trimmed.to_string(),
                max: self.menu().len(),
            }),
        }
    }

    /// Start over with the same name and settings.
    pub fn restart(&mut self) {
        let name = self.state.protagonist_name.clone();
        self.state = fresh_state(&self.config, name);
        self.quit = false;
        tracing::info!(session = %self.state.session_id, "game restarted");
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Get a mutable reference to the game state.
    ///
    /// Use with caution - direct modifications bypass the rules engine.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ending(&self) -> Option<Ending> {
        self.state.ending
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Whether the game reached an ending or the player quit.
    pub fn is_over(&self) -> bool {
        self.state.ending.is_some() || self.quit
    }

    /// Record any ending the current position already satisfies.
    fn settle(&mut self) {
        if let Some(ending) = self.check_arrival() {
            for line in ending_narration(ending) {
                self.state.add_narrative(line.text, line.kind);
            }
        }
    }

    /// Evaluate the arrival predicates if a location menu is about to show.
    fn check_arrival(&mut self) -> Option<Ending> {
        if self.state.screen != Screen::Location {
            return None;
        }
        let ending = check_arrival(&self.state)?;
        self.state.set_ending(ending).then_some(ending)
    }
}

fn fresh_state(config: &GameConfig, name: String) -> GameState {
    let mut state = GameState::new(name, config.game.starting_hours);
    for line in intro() {
        state.add_narrative(line.text, line.kind);
    }
    state
}

fn seeded_rng(config: &GameConfig) -> Box<dyn RngCore + Send> {
    match config.game.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    }
}

/// Title and epilogue for an ending.
pub fn ending_narration(ending: Ending) -> Vec<Narration> {
    std::iter::once(Narration::new(
        NarrativeType::Ending,
        format!("--- Ending Achieved: {} ---", ending.title()),
    ))
    .chain(
        ending
            .epilogue()
            .iter()
            .map(|line| Narration::new(NarrativeType::Ending, *line)),
    )
    .collect()
}
