//! Testing utilities for the game.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for scripted scenarios with a deterministic RNG
//! - Assertion helpers for verifying game state

use crate::config::GameConfig;
use crate::ending::Ending;
use crate::menu::Menu;
use crate::rules::Action;
use crate::session::{GameSession, Turn};
use crate::world::{Friend, GameState, Item, LocationId, Screen};
use rand::rngs::mock::StepRng;

/// Every random roll succeeds: thefts go unnoticed, rumors are found.
pub fn lucky_rng() -> StepRng {
    StepRng::new(0, 0)
}

/// Every random roll fails.
pub fn unlucky_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Test harness for running game scenarios.
///
/// Choices are made by [`Action`] rather than by number, so scripts keep
/// working when menus are reordered.
pub struct TestHarness {
    pub session: GameSession,
    /// Every turn taken so far.
    pub turns: Vec<Turn>,
}

impl TestHarness {
    /// A 24 hour game where every roll succeeds.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default().with_default_name("Test Hero"))
    }

    /// A game where every roll fails.
    pub fn unlucky() -> Self {
        let mut harness = Self::new();
        harness.session = GameSession::new(harness.session.config().clone()).with_rng(unlucky_rng());
        harness
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            session: GameSession::new(config).with_rng(lucky_rng()),
            turns: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        self.session.state()
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        self.session.state_mut()
    }

    pub fn menu(&self) -> Menu {
        self.session.menu()
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Teleport to a location's menu.
    pub fn at(&mut self, location: LocationId) -> &mut Self {
        let state = self.session.state_mut();
        state.location = location;
        state.screen = Screen::Location;
        self
    }

    pub fn give(&mut self, item: Item) -> &mut Self {
        self.session.state_mut().inventory.add(item);
        self
    }

    pub fn cash(&mut self, cash: i32) -> &mut Self {
        self.session.state_mut().cash = cash;
        self
    }

    pub fn knowledge(&mut self, knowledge: i32) -> &mut Self {
        self.session.state_mut().knowledge = knowledge;
        self
    }

    pub fn tech_parts(&mut self, parts: i32) -> &mut Self {
        self.session.state_mut().tech_parts = parts;
        self
    }

    pub fn trust(&mut self, friend: Friend, value: f32) -> &mut Self {
        *self.session.state_mut().trust.get_mut(friend) = value;
        self
    }

    // ------------------------------------------------------------------
    // Playing
    // ------------------------------------------------------------------

    /// Pick the option that triggers `action`.
    ///
    /// Panics if the current menu doesn't offer it.
    #[track_caller]
    pub fn choose(&mut self, action: Action) -> &Turn {
        let menu = self.session.menu();
        let Some(n) = menu.position(action) else {
            panic!(
                "{action:?} is not offered on '{}': {:?}",
                menu.title,
                menu.numbered()
            );
        };
        match self.session.choose(n) {
            Ok(turn) => {
                self.turns.push(turn);
                let last = self.turns.len() - 1;
                &self.turns[last]
            }
            Err(e) => panic!("choosing {action:?} failed: {e}"),
        }
    }

    /// Pick several options in order.
    #[track_caller]
    pub fn play(&mut self, actions: &[Action]) -> &mut Self {
        for action in actions {
            self.choose(*action);
        }
        self
    }

    pub fn offers(&self, action: Action) -> bool {
        self.session.menu().position(action).is_some()
    }

    /// Whether any turn so far narrated text containing `needle`.
    pub fn narrated(&self, needle: &str) -> bool {
        self.turns
            .iter()
            .flat_map(|t| t.narration.iter())
            .any(|n| n.text.contains(needle))
    }

    pub fn last_narration(&self) -> Vec<&str> {
        self.turns
            .last()
            .map(|t| t.narration.iter().map(|n| n.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

#[track_caller]
pub fn assert_at(harness: &TestHarness, location: LocationId) {
    assert_eq!(
        harness.state().location,
        location,
        "Expected to be at {location}, but at {}",
        harness.state().location
    );
}

#[track_caller]
pub fn assert_ending(harness: &TestHarness, ending: Ending) {
    assert_eq!(harness.session.ending(), Some(ending), "Expected ending {ending}");
}

#[track_caller]
pub fn assert_no_ending(harness: &TestHarness) {
    assert!(
        harness.session.ending().is_none(),
        "Expected the game to continue, got {:?}",
        harness.session.ending()
    );
}

#[track_caller]
pub fn assert_has_item(harness: &TestHarness, item: Item) {
    assert!(harness.state().has_item(item), "Expected to carry {item:?}");
}

#[track_caller]
pub fn assert_minutes_left(harness: &TestHarness, minutes: u32) {
    assert_eq!(
        harness.state().time_remaining(),
        minutes,
        "Expected {minutes} minutes left"
    );
}
