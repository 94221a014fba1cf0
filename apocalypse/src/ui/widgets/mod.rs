//! TUI widgets for the game

pub mod input;
pub mod menu;
pub mod narrative;
pub mod status_panel;

pub use input::InputWidget;
pub use menu::MenuWidget;
pub use narrative::NarrativeWidget;
pub use status_panel::StatusPanelWidget;
