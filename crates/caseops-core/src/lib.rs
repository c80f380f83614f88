//! caseops-core: panel state model for the case operations dashboard.
//!
//! Holds the operation result documents, the per-panel state slots and their
//! merge-update protocol, the client-side filter engine, the bulk action
//! selector, validation errors, configuration and logging setup.

pub mod bulk;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod panel;
pub mod state;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "caseops-core"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "caseops-core");
    }
}
