// Terminal front end for the skater dashboard.

pub mod app;
pub mod protocol;
pub mod tui;
