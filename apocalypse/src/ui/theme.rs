//! Color theme and styling for the Apocalypse TUI

use ratatui::style::{Color, Modifier, Style};

use apocalypse_core::world::{DayPhase, NarrativeType};

/// Game UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Clock colors
    pub clock_calm: Color,
    pub clock_worried: Color,
    pub clock_critical: Color,

    // Text colors
    pub narration_text: Color,
    pub choice_text: Color,
    pub dialogue_text: Color,
    pub gain_text: Color,
    pub warning_text: Color,
    pub clock_text: Color,
    pub ending_text: Color,
    pub system_text: Color,

    // Menu colors
    pub selected: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            clock_calm: Color::Green,
            clock_worried: Color::Yellow,
            clock_critical: Color::Red,

            narration_text: Color::White,
            choice_text: Color::Cyan,
            dialogue_text: Color::Yellow,
            gain_text: Color::LightGreen,
            warning_text: Color::LightRed,
            clock_text: Color::Magenta,
            ending_text: Color::LightYellow,
            system_text: Color::DarkGray,

            selected: Color::Cyan,
        }
    }
}

impl GameTheme {
    /// Style for a narrative entry
    pub fn narrative_style(&self, kind: NarrativeType) -> Style {
        match kind {
            NarrativeType::Narration => Style::default().fg(self.narration_text),
            NarrativeType::PlayerChoice => Style::default()
                .fg(self.choice_text)
                .add_modifier(Modifier::ITALIC),
            NarrativeType::Dialogue => Style::default().fg(self.dialogue_text),
            NarrativeType::Gain => Style::default().fg(self.gain_text),
            NarrativeType::Warning => Style::default()
                .fg(self.warning_text)
                .add_modifier(Modifier::BOLD),
            NarrativeType::Clock => Style::default().fg(self.clock_text),
            NarrativeType::Ending => Style::default()
                .fg(self.ending_text)
                .add_modifier(Modifier::BOLD),
            NarrativeType::System => Style::default()
                .fg(self.system_text)
                .add_modifier(Modifier::DIM),
        }
    }

    /// Clock color for the part of the day
    pub fn phase_color(&self, phase: DayPhase) -> Color {
        match phase {
            DayPhase::Morning | DayPhase::Afternoon => self.clock_calm,
            DayPhase::Evening => self.clock_worried,
            DayPhase::Night => self.clock_critical,
        }
    }

    /// Style for a menu option
    pub fn option_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.selected)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(self.foreground)
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.foreground)
            .add_modifier(Modifier::BOLD)
    }
}
