//! Main application state and logic

use std::path::PathBuf;

use apocalypse_core::world::NarrativeType;
use apocalypse_core::{GameSession, Menu, SessionError};

use crate::ui::theme::GameTheme;
use crate::ui::widgets::narrative::NarrativeItem;

/// Longest name the prompt accepts
pub const MAX_NAME_LEN: usize = 24;

/// Where the player is in the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Asking for the protagonist's name
    NamePrompt,
    Playing,
    /// An ending was reached or the player quit from the menu
    Ended,
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
}

/// Main application state
pub struct App {
    pub session: GameSession,
    pub phase: Phase,

    // UI state
    pub theme: GameTheme,
    overlay: Option<Overlay>,

    // Narrative display
    pub narrative_history: Vec<NarrativeItem>,
    pub narrative_scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Menu state
    pub selected: usize,
    digits: String,

    name_buffer: String,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,
    pub pending_save: Option<PathBuf>,
}

impl App {
    /// Create the app around a session. `ask_name` shows the name prompt first.
    pub fn new(session: GameSession, ask_name: bool) -> Self {
        let mut app = Self {
            session,
            phase: if ask_name {
                Phase::NamePrompt
            } else {
                Phase::Playing
            },
            theme: GameTheme::default(),
            overlay: None,
            narrative_history: Vec::new(),
            narrative_scroll: 0,
            scroll_locked_to_bottom: true,
            selected: 0,
            digits: String::new(),
            name_buffer: String::new(),
            status_message: None,
            should_quit: false,
            pending_save: None,
        };

        app.sync_history();
        if app.session.is_over() {
            app.phase = Phase::Ended;
        }
        app
    }

    /// Rebuild the story log from the session's history
    pub fn sync_history(&mut self) {
        self.narrative_history = self
            .session
            .state()
            .narrative_history
            .iter()
            .map(|entry| {
                NarrativeItem::new(
                    entry.content.clone(),
                    entry.entry_type,
                    entry.minutes_remaining,
                )
            })
            .collect();
        self.add_narrative(
            "Use ↑/↓ and Enter or type a number to choose. Press ? for help.".to_string(),
            NarrativeType::System,
        );
    }

    /// Add a narrative entry
    pub fn add_narrative(&mut self, content: String, entry_type: NarrativeType) {
        let minutes = self.session.state().time_remaining();
        self.narrative_history
            .push(NarrativeItem::new(content, entry_type, minutes));
        if self.scroll_locked_to_bottom {
            self.scroll_to_bottom();
        }
    }

    pub fn menu(&self) -> Menu {
        self.session.menu()
    }

    // ========================================================================
    // Menu selection
    // ========================================================================

    pub fn select_next(&mut self) {
        let len = self.menu().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
        self.digits.clear();
    }

    pub fn select_prev(&mut self) {
        let len = self.menu().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
        self.digits.clear();
    }

    /// Handle a typed digit.
    ///
    /// Chooses immediately once the number can't grow into another valid
    /// option; otherwise highlights it and waits for Enter or another digit.
    pub fn type_digit(&mut self, digit: char) {
        let len = self.menu().len();
        self.digits.push(digit);

        let Ok(number) = self.digits.parse::<usize>() else {
            self.digits.clear();
            return;
        };
        if number == 0 || number > len {
            self.set_status(format!("No option {number}. Choose 1-{len}."));
            self.digits.clear();
            return;
        }

        self.selected = number - 1;
        if number * 10 > len {
            self.choose_selected();
        }
    }

    /// Choose the highlighted option and record what happened
    pub fn choose_selected(&mut self) {
        self.digits.clear();
        let choice = self.selected + 1;
        let minutes = self.session.state().time_remaining();

        match self.session.choose(choice) {
            Ok(turn) => {
                // Stamped with the time the choice was made
                self.narrative_history.push(NarrativeItem::new(
                    turn.label,
                    NarrativeType::PlayerChoice,
                    minutes,
                ));
                if self.scroll_locked_to_bottom {
                    self.scroll_to_bottom();
                }
                for line in turn.narration {
                    self.add_narrative(line.text, line.kind);
                }
                self.selected = 0;
                self.clear_status();

                if turn.quit {
                    self.should_quit = true;
                } else if turn.ending.is_some() {
                    self.phase = Phase::Ended;
                    self.add_narrative(
                        "Press r to play again or q to quit.".to_string(),
                        NarrativeType::System,
                    );
                }
            }
            Err(SessionError::GameOver) => self.phase = Phase::Ended,
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Start a fresh game with the same name
    pub fn restart(&mut self) {
        self.session.restart();
        self.phase = Phase::Playing;
        self.selected = 0;
        self.scroll_locked_to_bottom = true;
        self.sync_history();
        self.set_status("New game started");
    }

    /// Queue a quick save; the main loop performs it
    pub fn request_save(&mut self) {
        self.pending_save = Some(self.session.auto_save_path());
    }

    // ========================================================================
    // Name prompt
    // ========================================================================

    pub fn name_buffer(&self) -> &str {
        &self.name_buffer
    }

    pub fn type_name_char(&mut self, c: char) {
        if self.name_buffer.chars().count() < MAX_NAME_LEN && !c.is_control() {
            self.name_buffer.push(c);
        }
    }

    pub fn name_backspace(&mut self) {
        self.name_buffer.pop();
    }

    /// Accept the typed name, or keep the default if it's blank
    pub fn submit_name(&mut self) {
        let name = self.name_buffer.trim();
        if !name.is_empty() {
            self.session.state_mut().protagonist_name = name.to_string();
        }
        self.name_buffer.clear();
        self.phase = Phase::Playing;
        let name = self.session.state().protagonist_name.clone();
        self.add_narrative(format!("You are {name}."), NarrativeType::System);
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Scroll narrative to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        // The widget caps this to the real maximum
        self.narrative_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    /// Estimate max scroll assuming ~60 char lines and a 20 line panel
    fn estimate_max_scroll(&self) -> usize {
        const ESTIMATED_WIDTH: usize = 60;
        const ESTIMATED_VISIBLE_HEIGHT: usize = 20;

        let estimated_lines: usize = self
            .narrative_history
            .iter()
            .map(|item| {
                item.content
                    .lines()
                    .map(|line| (line.len() / ESTIMATED_WIDTH).max(1))
                    .sum::<usize>()
                    + 1
            })
            .sum();

        estimated_lines.saturating_sub(ESTIMATED_VISIBLE_HEIGHT)
    }

    /// Scroll narrative up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.narrative_scroll > max_scroll {
            self.narrative_scroll = max_scroll;
        }
        self.narrative_scroll = self.narrative_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.narrative_scroll = self.narrative_scroll.saturating_add(lines);
        let max_scroll = self.estimate_max_scroll();
        if self.narrative_scroll >= max_scroll {
            self.scroll_to_bottom();
        }
    }

    // ========================================================================
    // Overlays and status
    // ========================================================================

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            None => Some(Overlay::Help),
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
