//! Render orchestration for the Apocalypse TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Overlay, Phase, MAX_NAME_LEN};
use crate::ui::layout::{centered_rect_fixed, AppLayout};
use crate::ui::widgets::{InputWidget, MenuWidget, NarrativeWidget, StatusPanelWidget};

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let menu = app.menu();
    let layout = AppLayout::calculate(area, MenuWidget::height(&menu));

    render_title_bar(frame, app, layout.title_area);

    let narrative_widget = NarrativeWidget::new(&app.narrative_history, &app.theme)
        .scroll(app.narrative_scroll)
        .focused(!app.scroll_locked_to_bottom);
    frame.render_widget(narrative_widget, layout.narrative_area);

    if layout.has_sidebar() {
        frame.render_widget(
            StatusPanelWidget::new(app.session.state(), &app.theme),
            layout.sidebar_area,
        );
    }

    match app.phase {
        Phase::NamePrompt => {
            let input = InputWidget::new(app.name_buffer(), MAX_NAME_LEN, &app.theme)
                .fallback(&app.session.state().protagonist_name);
            frame.render_widget(input, layout.menu_area);
        }
        Phase::Playing => {
            frame.render_widget(
                MenuWidget::new(&menu, &app.theme).selected(app.selected),
                layout.menu_area,
            );
        }
        Phase::Ended => render_ending(frame, app, layout.menu_area),
    }

    render_hotkey_bar(frame, app, layout.hotkey_bar);

    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, overlay, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.session.state();
    let clock = &state.clock;
    let line = Line::from(vec![
        Span::styled(" APOCALYPSE NIGHTMARE ", app.theme.title_style()),
        Span::raw("| "),
        Span::raw(state.location.name()),
        Span::raw(" | "),
        Span::styled(
            format!("{} | {} left ", clock.phase, clock.display()),
            Style::default()
                .fg(app.theme.phase_color(clock.phase))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the ending panel in place of the menu
fn render_ending(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.session.ending() {
        Some(ending) => {
            let outcome = if ending.is_survival() {
                "You survived."
            } else {
                "You did not survive."
            };
            vec![
                Line::from(Span::styled(
                    ending.title().to_string(),
                    app.theme.narrative_style(apocalypse_core::NarrativeType::Ending),
                )),
                Line::from(outcome),
                Line::from("r: play again   q: quit"),
            ]
        }
        None => vec![Line::from("Game over. r: play again   q: quit")],
    };

    let block = Block::default()
        .title(" The End ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Render the hotkey bar, or the status message if there is one
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.status_message() {
        Some(message) => message.to_string(),
        None => match app.phase {
            Phase::NamePrompt => " Enter: confirm   Esc: keep default ".to_string(),
            Phase::Playing => {
                " ↑/↓: select  Enter/1-9: choose  PgUp/PgDn: scroll  Ctrl-S: save  ?: help "
                    .to_string()
            }
            Phase::Ended => " r: restart  q: quit  Ctrl-S: save ".to_string(),
        },
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::DIM),
        ))),
        area,
    );
}

fn render_overlay(frame: &mut Frame, app: &App, overlay: Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help_overlay(frame, app, area),
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(60, 20, area);
    frame.render_widget(Clear, popup_area);

    let underlined = Style::default().add_modifier(Modifier::UNDERLINED);
    let mut help_text = vec![
        Line::from(Span::styled(
            " Apocalypse Nightmare - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Here:", underlined)),
    ];
    help_text.push(Line::from(format!(
        "  {}",
        apocalypse_core::locations::info(app.session.state().location).help
    )));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled("Keys:", underlined)),
        Line::from("  ↑/↓ or j/k     Select an option"),
        Line::from("  Enter          Choose the selected option"),
        Line::from("  1-9, 10..      Choose by number"),
        Line::from("  PgUp/PgDn      Scroll the story"),
        Line::from("  G              Jump to the latest entry"),
        Line::from("  Ctrl-S         Quick save"),
        Line::from("  Ctrl-C         Quit immediately"),
        Line::from(""),
        Line::from("Every choice costs time. Watch the clock."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or q to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ]);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    frame.render_widget(
        Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}
