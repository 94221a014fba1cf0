//! UI module for the Apocalypse TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
