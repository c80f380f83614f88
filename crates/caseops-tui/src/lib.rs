//! caseops-tui: terminal dashboard for the case processing back office.
//!
//! [`app::TabHost`] holds the six operation panels and renders one at a time;
//! [`interactive_runtime`] drives it from a real terminal.

pub mod app;
pub mod interactive_runtime;
pub mod launch;
pub mod panel_error_boundary;
pub mod views;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "caseops-tui"
}
