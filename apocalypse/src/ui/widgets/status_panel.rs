//! Status panel widget for sidebar display

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use apocalypse_core::world::{Flag, Friend, GameState, TRUST_SCALE};

use crate::ui::theme::GameTheme;

/// Flags worth showing the player, with their sidebar labels
const SHOWN_FLAGS: [(Flag, &str); 7] = [
    (Flag::ParentsWarned, "Parents warned"),
    (Flag::SharedVisionWithFriends, "Friends know"),
    (Flag::MayorWarned, "Mayor warned"),
    (Flag::MobOfCivilians, "Crowd rallied"),
    (Flag::MilitaryBaseAccessed, "Inside the base"),
    (Flag::BunkerUnlocked, "Bunker open"),
    (Flag::HasCarKeys, "Truck keys"),
];

/// Compact status panel for the sidebar
pub struct StatusPanelWidget<'a> {
    state: &'a GameState,
    theme: &'a GameTheme,
}

impl<'a> StatusPanelWidget<'a> {
    pub fn new(state: &'a GameState, theme: &'a GameTheme) -> Self {
        Self { state, theme }
    }
}

impl Widget for StatusPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.state.protagonist_name))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Clock gauge
                Constraint::Length(6), // Counters
                Constraint::Length(5), // Trust
                Constraint::Min(0),    // Flags and items
            ])
            .split(inner);

        // Time left
        let clock = &self.state.clock;
        let ratio = if clock.budget_minutes > 0 {
            clock.remaining_minutes as f64 / clock.budget_minutes as f64
        } else {
            0.0
        };
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.phase_color(clock.phase)))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format!("{} left", clock.display()))
            .render(chunks[0], buf);

        let counters = vec![
            counter_line("Knowledge", self.state.knowledge.to_string()),
            counter_line("Cash", self.state.cash.to_string()),
            counter_line("Tech parts", self.state.tech_parts.to_string()),
            counter_line("Authority", format!("{:.1}", self.state.authority)),
            counter_line("Truck gas", self.state.car_gas.to_string()),
            counter_line("Turn", self.state.turn.to_string()),
        ];
        Paragraph::new(counters).render(chunks[1], buf);

        let mut trust = vec![Line::from(Span::styled(
            "Trust:",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        trust.extend(Friend::ALL.iter().map(|friend| {
            Line::from(format!(
                "  {:<5} {:>4.1}/{TRUST_SCALE} {}",
                friend.name(),
                self.state.trust(*friend),
                friend.role()
            ))
        }));
        Paragraph::new(trust).render(chunks[2], buf);

        if chunks[3].height > 0 {
            let mut lines: Vec<Line> = SHOWN_FLAGS
                .iter()
                .filter(|(flag, _)| self.state.flags.get(*flag))
                .map(|(_, label)| Line::from(format!("[X] {label}")))
                .collect();

            if !self.state.inventory.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Carrying:",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for item in self.state.inventory.iter() {
                    lines.push(Line::from(format!("  {}", item.name())));
                }
            }

            Paragraph::new(lines).render(chunks[3], buf);
        }
    }
}

fn counter_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}
