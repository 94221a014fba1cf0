//! Name prompt shown before the first turn

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// Single-line text field with a character counter in the border.
///
/// An empty field shows the name that will be used if nothing is typed.
pub struct InputWidget<'a> {
    content: &'a str,
    fallback: &'a str,
    max_len: usize,
    theme: &'a GameTheme,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, max_len: usize, theme: &'a GameTheme) -> Self {
        Self {
            content,
            fallback: "",
            max_len,
            theme,
        }
    }

    pub fn fallback(mut self, fallback: &'a str) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let used = self.content.chars().count();
        let block = Block::default()
            .title(" What's your name? ")
            .title_bottom(Line::from(format!(" {used}/{} ", self.max_len)).right_aligned())
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let cursor = Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK));
        let line = if self.content.is_empty() {
            Line::from(vec![
                cursor,
                Span::styled(
                    format!(" (Enter for {})", self.fallback),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled(self.content, self.theme.option_style(false)),
                cursor,
            ])
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
