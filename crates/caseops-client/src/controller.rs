//! Operation lifecycle: validate, dispatch, settle.
//!
//! A dispatch is split in three so the UI loop can own all state while the
//! request itself runs elsewhere:
//!
//! 1. [`OperationController::prepare`] checks preconditions and merges the
//!    dispatch-start patch (`loading` on, stale `result`/`error` cleared).
//! 2. [`OperationController::execute`] performs exactly one backend call and
//!    turns the outcome into a [`Completion`] carrying the operator message.
//! 3. [`OperationController::apply`] merges the completion into the panel's
//!    slot, always clearing `loading`.
//!
//! The letter Excel export follows the same shape on its own slot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use caseops_core::bulk::{parse_document_numbers, BulkAction};
use caseops_core::error::ValidationError;
use caseops_core::model::{DailyReportResult, OperationResult};
use caseops_core::panel::{PanelKind, DOWNLOAD_FALLBACK_ERROR};
use caseops_core::state::{FileDraft, PanelPatch, SavedDownload, SelectedFile, StateStore};

use crate::backend::OperationsBackend;
use crate::download::save_download;
use crate::error::BackendError;

/// A validated request whose dispatch-start patch is already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    /// Body-less batch trigger.
    Process(PanelKind),
    UploadDailyReport(SelectedFile),
    Bulk {
        action: BulkAction,
        document_numbers: Vec<String>,
    },
}

impl PendingRequest {
    #[must_use]
    pub fn panel(&self) -> PanelKind {
        match self {
            Self::Process(panel) => *panel,
            Self::UploadDailyReport(_) => PanelKind::DailyReport,
            Self::Bulk { .. } => PanelKind::MoveCaseStatus,
        }
    }

    /// Last-resort message if the failure carries no readable text.
    #[must_use]
    pub fn fallback_error(&self) -> String {
        match self {
            Self::Bulk { action, .. } => action.fallback_error(),
            other => other.panel().fallback_error().to_string(),
        }
    }
}

/// Outcome of one request, ready to merge. Errors are already operator text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub panel: PanelKind,
    pub outcome: Result<OperationResult, String>,
}

/// A started Excel export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCompletion {
    pub outcome: Result<SavedDownload, String>,
}

/// Drives panel operations against a backend.
pub struct OperationController<B: ?Sized> {
    backend: Arc<B>,
    download_dir: PathBuf,
}

impl<B: ?Sized> Clone for OperationController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            download_dir: self.download_dir.clone(),
        }
    }
}

impl<B> OperationController<B>
where
    B: OperationsBackend + ?Sized,
{
    pub fn new(backend: Arc<B>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            download_dir: download_dir.into(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    // -----------------------------------------------------------------------
    // Panel operations
    // -----------------------------------------------------------------------

    /// Validate `panel`'s input and mark it loading.
    ///
    /// On a validation failure the message is merged into the slot and no
    /// request is produced. A panel that is already loading is refused
    /// without touching its state.
    pub fn prepare(
        &self,
        store: &mut StateStore,
        panel: PanelKind,
    ) -> Result<PendingRequest, ValidationError> {
        if store.is_loading(panel) {
            return Err(ValidationError::AlreadyLoading);
        }
        let request = match panel {
            PanelKind::DailyReport => Self::prepare_upload(store)?,
            PanelKind::MoveCaseStatus => Self::prepare_bulk(store)?,
            other => {
                store.begin(other);
                PendingRequest::Process(other)
            }
        };
        info!(panel = panel.as_str(), "dispatching operation");
        Ok(request)
    }

    fn prepare_upload(store: &mut StateStore) -> Result<PendingRequest, ValidationError> {
        let slot = &mut store.daily_report;
        let Some(file) = slot.state().draft.selected.clone() else {
            let err = ValidationError::NoFileSelected;
            slot.merge(PanelPatch::rejected(err.to_string()));
            return Err(err);
        };
        if !file.is_csv() {
            let err = ValidationError::NotCsv {
                name: file.name.clone(),
            };
            slot.merge(PanelPatch::rejected(err.to_string()).draft(FileDraft::default()));
            return Err(err);
        }
        slot.merge(PanelPatch::dispatch_start().draft(FileDraft::default()));
        Ok(PendingRequest::UploadDailyReport(file))
    }

    fn prepare_bulk(store: &mut StateStore) -> Result<PendingRequest, ValidationError> {
        let slot = &mut store.move_case_status;
        let draft = &slot.state().draft;
        let Some(action) = draft.action else {
            let err = ValidationError::NoActionSelected;
            slot.merge(PanelPatch::rejected(err.to_string()));
            return Err(err);
        };
        let document_numbers = parse_document_numbers(&draft.document_text);
        if document_numbers.is_empty() {
            let err = ValidationError::NoDocumentNumbers;
            slot.merge(PanelPatch::rejected(err.to_string()));
            return Err(err);
        }
        slot.merge(PanelPatch::dispatch_start());
        Ok(PendingRequest::Bulk {
            action,
            document_numbers,
        })
    }

    /// Perform the backend call for a prepared request.
    pub async fn execute(&self, request: &PendingRequest) -> Completion {
        let panel = request.panel();
        let outcome = match request {
            PendingRequest::Process(panel) => self.backend.process(*panel).await,
            PendingRequest::UploadDailyReport(file) => self
                .upload(file)
                .await
                .map(OperationResult::DailyReport),
            PendingRequest::Bulk {
                action,
                document_numbers,
            } => self
                .backend
                .bulk_update(*action, document_numbers)
                .await
                .map(OperationResult::CaseStatus),
        };
        let outcome = match outcome {
            Ok(result) if result.panel() == panel => Ok(result),
            Ok(result) => Err(BackendError::Decode {
                message: format!(
                    "{} response returned for {}",
                    result.panel().as_str(),
                    panel.as_str()
                ),
            }),
            Err(err) => Err(err),
        };
        let outcome = outcome.map_err(|err| {
            let message = err.user_message(&request.fallback_error());
            warn!(panel = panel.as_str(), error = %err, message = %message, "operation failed");
            message
        });
        if outcome.is_ok() {
            info!(panel = panel.as_str(), "operation succeeded");
        }
        Completion { panel, outcome }
    }

    async fn upload(
        &self,
        file: &SelectedFile,
    ) -> Result<DailyReportResult, BackendError> {
        let contents = tokio::fs::read(&file.path).await?;
        self.backend.upload_daily_report(&file.name, contents).await
    }

    /// Merge a completion into its own panel's slot.
    pub fn apply(store: &mut StateStore, completion: Completion) {
        match completion.outcome {
            Ok(result) => store.settle_success(result),
            Err(message) => store.settle_failure(completion.panel, &message),
        }
    }

    /// prepare, execute and apply in one step.
    pub async fn run_operation(
        &self,
        store: &mut StateStore,
        panel: PanelKind,
    ) -> Result<(), ValidationError> {
        let request = self.prepare(store, panel)?;
        let completion = self.execute(&request).await;
        Self::apply(store, completion);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Letter Excel export
    // -----------------------------------------------------------------------

    /// Mark the export as downloading. Independent of the letter panel's own
    /// `loading`.
    pub fn begin_download(&self, store: &mut StateStore) -> Result<PendingDownload, ValidationError> {
        if store.letter_download.state().loading {
            return Err(ValidationError::AlreadyLoading);
        }
        store.letter_download.merge(PanelPatch::dispatch_start());
        info!(dir = %self.download_dir.display(), "downloading letter excel");
        Ok(PendingDownload {
            dir: self.download_dir.clone(),
        })
    }

    pub async fn execute_download(&self, pending: &PendingDownload) -> DownloadCompletion {
        let outcome = match self.backend.download_letter_excel().await {
            Ok(file) => save_download(&pending.dir, &file).await,
            Err(err) => Err(err),
        };
        let outcome = outcome.map_err(|err| {
            let message = err.user_message(DOWNLOAD_FALLBACK_ERROR);
            warn!(error = %err, "letter excel download failed");
            message
        });
        if let Ok(saved) = &outcome {
            info!(path = %saved.path.display(), bytes = saved.bytes, "letter excel saved");
        }
        DownloadCompletion { outcome }
    }

    pub fn apply_download(store: &mut StateStore, completion: DownloadCompletion) {
        let patch = match completion.outcome {
            Ok(saved) => PanelPatch::success(saved),
            Err(message) => PanelPatch::failure(message),
        };
        store.letter_download.merge(patch);
    }

    pub async fn run_download(&self, store: &mut StateStore) -> Result<(), ValidationError> {
        let pending = self.begin_download(store)?;
        let completion = self.execute_download(&pending).await;
        Self::apply_download(store, completion);
        Ok(())
    }

    /// Probe the backend; returns the operator-facing status line.
    pub async fn health(&self) -> Result<String, String> {
        self.backend
            .health()
            .await
            .map(|text| text.trim().to_string())
            .map_err(|err| err.user_message("Backend unreachable"))
    }
}
