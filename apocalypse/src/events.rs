//! Event handling for the Apocalypse TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, Phase};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return EventResult::Quit,
            KeyCode::Char('s') if app.phase != Phase::NamePrompt => {
                app.request_save();
                return EventResult::NeedsRedraw;
            }
            _ => {}
        }
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    let result = match app.phase {
        Phase::NamePrompt => handle_name_prompt(app, key),
        Phase::Playing => handle_playing(app, key),
        Phase::Ended => handle_ended(app, key),
    };

    if app.should_quit {
        EventResult::Quit
    } else {
        result
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_name_prompt(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.submit_name(),
        KeyCode::Backspace => app.name_backspace(),
        KeyCode::Char(c) => app.type_name_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_playing(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),

        // Menu navigation
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.choose_selected(),
        KeyCode::Char(c) if c.is_ascii_digit() => app.type_digit(c),

        // Story scrolling
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),

        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

fn handle_ended(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('r') => {
            app.restart();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
