//! Story log widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use apocalypse_core::world::NarrativeType;

use crate::ui::theme::GameTheme;

/// One entry in the story log
#[derive(Debug, Clone)]
pub struct NarrativeItem {
    pub content: String,
    pub entry_type: NarrativeType,
    /// Minutes left on the clock when the entry was written
    pub minutes_remaining: u32,
}

impl NarrativeItem {
    pub fn new(content: String, entry_type: NarrativeType, minutes_remaining: u32) -> Self {
        Self {
            content,
            entry_type,
            minutes_remaining,
        }
    }
}

/// The scrolling story log. Each choice opens a new paragraph stamped with
/// the time that was left when it was made.
pub struct NarrativeWidget<'a> {
    items: &'a [NarrativeItem],
    scroll: usize,
    theme: &'a GameTheme,
    focused: bool,
}

impl<'a> NarrativeWidget<'a> {
    pub fn new(items: &'a [NarrativeItem], theme: &'a GameTheme) -> Self {
        Self {
            items,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    /// Focused while the player is reading back through the log
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        for item in self.items {
            let style = self.theme.narrative_style(item.entry_type);
            match item.entry_type {
                NarrativeType::PlayerChoice => {
                    if !lines.is_empty() {
                        lines.push(Line::from(""));
                    }
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(
                                "[{}:{:02}] ",
                                item.minutes_remaining / 60,
                                item.minutes_remaining % 60
                            ),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                        Span::styled(format!("> {}", item.content), style),
                    ]));
                }
                NarrativeType::Ending => {
                    lines.push(
                        Line::from(Span::styled(item.content.clone(), style))
                            .alignment(Alignment::Center),
                    );
                }
                _ => lines.extend(
                    item.content
                        .lines()
                        .map(|l| Line::from(Span::styled(l.to_string(), style))),
                ),
            }
        }
        lines
    }
}

impl Widget for NarrativeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = area.height.saturating_sub(2) as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);

        let title = if scroll < max_scroll {
            format!(" Story ({} more below) ", max_scroll - scroll)
        } else {
            " Story ".to_string()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(lines)
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        if max_scroll > 0 {
            let mut state = ScrollbarState::new(max_scroll).position(scroll);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .style(self.theme.border_style(self.focused))
                .render(area, buf, &mut state);
        }
    }
}
