//! Screen areas for the Apocalypse TUI
//!
//! ```text
//! title bar ------------------------------------
//! story log                      | status panel
//! -------------------------------|
//! menu                           |
//! hotkey bar -----------------------------------
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

/// Narrow terminals drop the sidebar below this width
const MIN_WIDTH_FOR_SIDEBAR: u16 = 70;
const SIDEBAR_WIDTH: u16 = 34;

pub struct AppLayout {
    pub title_area: Rect,
    pub narrative_area: Rect,
    /// Zero-sized when the terminal is too narrow
    pub sidebar_area: Rect,
    pub menu_area: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    /// `menu_lines` is the number of lines the menu wants, borders excluded.
    /// The menu never takes more than half of the rows.
    pub fn calculate(area: Rect, menu_lines: u16) -> Self {
        let [title_area, body, hotkey_bar] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let sidebar_width = if body.width >= MIN_WIDTH_FOR_SIDEBAR {
            SIDEBAR_WIDTH
        } else {
            0
        };
        let [left, sidebar_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(sidebar_width)])
                .areas(body);

        let menu_height = menu_lines
            .saturating_add(2)
            .clamp(3, (left.height / 2).max(3));
        let [narrative_area, menu_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(menu_height)]).areas(left);

        Self {
            title_area,
            narrative_area,
            sidebar_area,
            menu_area,
            hotkey_bar,
        }
    }

    pub fn has_sidebar(&self) -> bool {
        self.sidebar_area.width > 0
    }
}

/// A `width` x `height` box in the middle of `area`, shrunk to fit
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_fits_its_options() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 100, 40), 10);
        assert_eq!(layout.menu_area.height, 12);
        assert!(layout.has_sidebar());
        assert_eq!(layout.narrative_area.width, layout.menu_area.width);
    }

    #[test]
    fn test_menu_capped_at_half_the_body() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 100, 20), 30);
        assert_eq!(layout.menu_area.height, 9);
    }

    #[test]
    fn test_narrow_terminal_hides_sidebar() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 60, 30), 5);
        assert!(!layout.has_sidebar());
        assert_eq!(layout.narrative_area.width, 60);
    }

    #[test]
    fn test_popup_shrinks_to_fit() {
        let popup = centered_rect_fixed(60, 20, Rect::new(0, 0, 40, 10));
        assert_eq!(popup, Rect::new(0, 0, 40, 10));
    }
}
