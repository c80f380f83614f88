//! caseops-client: backend access and the operation controller.
//!
//! Provides a transport-agnostic `OperationsBackend` trait with:
//! - `HttpBackend`: reqwest client for the case processing service
//! - `MockBackend`: configurable mock for unit testing
//!
//! `OperationController` runs the validate / dispatch / settle lifecycle for
//! every panel against any backend.

pub mod backend;
pub mod controller;
pub mod download;
pub mod error;
pub mod http;
pub mod mock;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "caseops-client"
}
