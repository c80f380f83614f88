//! Backend service trait.
//!
//! One method per remote action. Implementations run against the case
//! processing HTTP service or are mocked for tests.

use async_trait::async_trait;

use caseops_core::bulk::BulkAction;
use caseops_core::model::{CaseStatusResult, DailyReportResult, OperationResult};
use caseops_core::panel::PanelKind;

use crate::error::BackendError;

/// Raw Excel export as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    /// `Content-Disposition` header, verbatim.
    pub content_disposition: Option<String>,
}

#[async_trait]
pub trait OperationsBackend: Send + Sync {
    /// Trigger a body-less batch run (data entry, MRT, letter, email) and
    /// decode its result document.
    async fn process(&self, panel: PanelKind) -> Result<OperationResult, BackendError>;

    /// Upload a daily report CSV as the multipart `file` field.
    async fn upload_daily_report(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<DailyReportResult, BackendError>;

    /// Apply a bulk status action to the given document numbers.
    async fn bulk_update(
        &self,
        action: BulkAction,
        document_numbers: &[String],
    ) -> Result<CaseStatusResult, BackendError>;

    async fn download_letter_excel(&self) -> Result<DownloadedFile, BackendError>;

    /// Liveness probe; returns the response text.
    async fn health(&self) -> Result<String, BackendError>;
}
