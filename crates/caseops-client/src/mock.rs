//! Mock backend for unit testing.
//!
//! Records every call and returns pre-configured responses. Unconfigured
//! calls succeed with an empty result document.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use caseops_core::bulk::BulkAction;
use caseops_core::model::{
    CaseStatusResult, DailyReportResult, DataEntryResult, EmailResult, LetterResult, MrtResult,
    OperationResult,
};
use caseops_core::panel::PanelKind;

use crate::backend::{DownloadedFile, OperationsBackend};
use crate::error::BackendError;

/// A recorded call to the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Process(PanelKind),
    UploadDailyReport { file_name: String, contents: Vec<u8> },
    BulkUpdate {
        action: BulkAction,
        document_numbers: Vec<String>,
    },
    DownloadLetterExcel,
    Health,
}

/// Mock implementation of [`OperationsBackend`].
pub struct MockBackend {
    responses: Mutex<HashMap<PanelKind, Result<OperationResult, BackendError>>>,
    download: Mutex<Option<Result<DownloadedFile, BackendError>>>,
    health: Mutex<Option<Result<String, BackendError>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            download: Mutex::new(None),
            health: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond to the result's own panel with `result`.
    pub fn with_result(self, result: OperationResult) -> Self {
        self.set_response(result.panel(), Ok(result));
        self
    }

    /// Fail every call for `panel` with `err`.
    pub fn with_error(self, panel: PanelKind, err: BackendError) -> Self {
        self.set_response(panel, Err(err));
        self
    }

    pub fn with_download(self, outcome: Result<DownloadedFile, BackendError>) -> Self {
        match self.download.lock() {
            Ok(mut slot) => *slot = Some(outcome),
            Err(poisoned) => *poisoned.into_inner() = Some(outcome),
        }
        self
    }

    pub fn with_health(self, outcome: Result<String, BackendError>) -> Self {
        match self.health.lock() {
            Ok(mut slot) => *slot = Some(outcome),
            Err(poisoned) => *poisoned.into_inner() = Some(outcome),
        }
        self
    }

    /// Replace the response for `panel` after construction.
    pub fn set_response(&self, panel: PanelKind, outcome: Result<OperationResult, BackendError>) {
        match self.responses.lock() {
            Ok(mut map) => {
                map.insert(panel, outcome);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(panel, outcome);
            }
        }
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn call_count(&self) -> usize {
        match self.calls.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn record(&self, call: MockCall) {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }

    fn response_for(&self, panel: PanelKind) -> Result<OperationResult, BackendError> {
        let configured = match self.responses.lock() {
            Ok(map) => map.get(&panel).cloned(),
            Err(poisoned) => poisoned.into_inner().get(&panel).cloned(),
        };
        configured.unwrap_or_else(|| Ok(empty_result(panel)))
    }
}

/// Empty result document for `panel`.
pub fn empty_result(panel: PanelKind) -> OperationResult {
    match panel {
        PanelKind::DataEntry => OperationResult::DataEntry(DataEntryResult::default()),
        PanelKind::DailyReport => OperationResult::DailyReport(DailyReportResult::default()),
        PanelKind::Mrt => OperationResult::Mrt(MrtResult::default()),
        PanelKind::Letter => OperationResult::Letter(LetterResult::default()),
        PanelKind::Email => OperationResult::Email(EmailResult::default()),
        PanelKind::MoveCaseStatus => OperationResult::CaseStatus(CaseStatusResult::default()),
    }
}

fn mismatched(panel: PanelKind) -> BackendError {
    BackendError::Decode {
        message: format!("mock response for {} has the wrong shape", panel.as_str()),
    }
}

#[async_trait]
impl OperationsBackend for MockBackend {
    async fn process(&self, panel: PanelKind) -> Result<OperationResult, BackendError> {
        self.record(MockCall::Process(panel));
        self.response_for(panel)
    }

    async fn upload_daily_report(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<DailyReportResult, BackendError> {
        self.record(MockCall::UploadDailyReport {
            file_name: file_name.to_string(),
            contents,
        });
        match self.response_for(PanelKind::DailyReport)? {
            OperationResult::DailyReport(result) => Ok(result),
            _ => Err(mismatched(PanelKind::DailyReport)),
        }
    }

    async fn bulk_update(
        &self,
        action: BulkAction,
        document_numbers: &[String],
    ) -> Result<CaseStatusResult, BackendError> {
        self.record(MockCall::BulkUpdate {
            action,
            document_numbers: document_numbers.to_vec(),
        });
        match self.response_for(PanelKind::MoveCaseStatus)? {
            OperationResult::CaseStatus(result) => Ok(result),
            _ => Err(mismatched(PanelKind::MoveCaseStatus)),
        }
    }

    async fn download_letter_excel(&self) -> Result<DownloadedFile, BackendError> {
        self.record(MockCall::DownloadLetterExcel);
        let configured = match self.download.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        configured.unwrap_or_else(|| {
            Ok(DownloadedFile {
                bytes: Vec::new(),
                content_disposition: None,
            })
        })
    }

    async fn health(&self) -> Result<String, BackendError> {
        self.record(MockCall::Health);
        let configured = match self.health.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        configured.unwrap_or_else(|| Ok("OK".to_string()))
    }
}
