//! Numbered menu widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use apocalypse_core::Menu;

use crate::ui::theme::GameTheme;

/// The options for the current screen, with one highlighted
pub struct MenuWidget<'a> {
    menu: &'a Menu,
    selected: usize,
    theme: &'a GameTheme,
}

impl<'a> MenuWidget<'a> {
    pub fn new(menu: &'a Menu, theme: &'a GameTheme) -> Self {
        Self {
            menu,
            selected: 0,
            theme,
        }
    }

    /// Zero-based index of the highlighted option
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    /// Lines needed to show the whole menu without borders
    pub fn height(menu: &Menu) -> u16 {
        (menu.options.len() + 1).min(u16::MAX as usize) as u16
    }
}

impl Widget for MenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.menu.title))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::with_capacity(self.menu.options.len() + 1);

        // Only the last prompt line fits here, the rest is in the story log
        if let Some(prompt) = self.menu.prompt.last() {
            lines.push(Line::from(Span::styled(
                prompt.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }

        for (i, option) in self.menu.options.iter().enumerate() {
            let marker = if i == self.selected { "▶ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}. {}", i + 1, option.label),
                self.theme.option_style(i == self.selected),
            )));
        }

        // Keep the selection visible in short terminals
        let visible = inner.height as usize;
        let scroll = (self.selected + 2).saturating_sub(visible);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
