//! Application shell for the alert dashboard
//!
//! Theme, menu bar and status bar. The dashboard views themselves live in
//! `aw-views`.

pub mod shell;
pub mod theme;

pub use shell::{freshness, menu_bar, status_bar, Freshness, ShellAction, StatusInfo};
pub use theme::{apply_theme, Theme};
