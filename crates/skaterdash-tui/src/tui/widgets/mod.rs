// TUI widget modules for each dashboard panel.

pub mod axis_pickers;
pub mod chart;
pub mod help_bar;
pub mod players;
pub mod profile;
pub mod quit_confirm;
pub mod status_bar;
