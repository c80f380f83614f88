//! Per-panel state slots and the merge-update protocol.
//!
//! The dashboard owns one [`PanelSlot`] per operation panel inside a
//! [`StateStore`]. Slots are written only through [`PanelSlot::update`]:
//! either a full replacement or a merge whose patch leaves every unspecified
//! field exactly as it was. That lets a controller flip `loading` without
//! clobbering draft input the operator typed a moment earlier.

use std::fmt;
use std::path::PathBuf;

use crate::bulk::BulkAction;
use crate::model::{
    CaseStatusResult, DailyReportResult, DataEntryResult, EmailResult, LetterResult,
    MrtResult, OperationResult,
};
use crate::panel::PanelKind;

// ---------------------------------------------------------------------------
// PanelState / PanelPatch
// ---------------------------------------------------------------------------

/// Lifecycle snapshot of one panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelState<R, D> {
    /// True strictly between dispatch and resolution of a request.
    pub loading: bool,
    pub result: Option<R>,
    pub error: Option<String>,
    /// Operator input that must outlive results and tab switches.
    pub draft: D,
}

/// Lifecycle step derived from a [`PanelState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl<R, D> PanelState<R, D> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    /// `result` and `error` are never both present.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !(self.result.is_some() && self.error.is_some())
    }

    fn apply(&mut self, patch: PanelPatch<R, D>) {
        if let Some(loading) = patch.loading {
            self.loading = loading;
        }
        if let Some(result) = patch.result {
            self.result = result;
        }
        if let Some(error) = patch.error {
            self.error = error;
        }
        if let Some(draft) = patch.draft {
            self.draft = draft;
        }
    }
}

/// Partial update for a [`PanelState`]. `None` means "leave untouched";
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelPatch<R, D> {
    pub loading: Option<bool>,
    pub result: Option<Option<R>>,
    pub error: Option<Option<String>>,
    pub draft: Option<D>,
}

impl<R, D> Default for PanelPatch<R, D> {
    fn default() -> Self {
        Self {
            loading: None,
            result: None,
            error: None,
            draft: None,
        }
    }
}

impl<R, D> PanelPatch<R, D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    #[must_use]
    pub fn result(mut self, result: Option<R>) -> Self {
        self.result = Some(result);
        self
    }

    #[must_use]
    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn draft(mut self, draft: D) -> Self {
        self.draft = Some(draft);
        self
    }

    /// `{loading: true, error: absent, result: absent}`; clears stale output
    /// before a new attempt.
    #[must_use]
    pub fn dispatch_start() -> Self {
        Self::new().loading(true).error(None).result(None)
    }

    /// `{result, loading: false}`.
    #[must_use]
    pub fn success(result: R) -> Self {
        Self::new().result(Some(result)).loading(false)
    }

    /// `{error, loading: false}`.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new().error(Some(message.into())).loading(false)
    }

    /// Local validation failure: `{error}` with any earlier result dropped.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new().error(Some(message.into())).result(None)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loading.is_none()
            && self.result.is_none()
            && self.error.is_none()
            && self.draft.is_none()
    }
}

// ---------------------------------------------------------------------------
// PanelSlot
// ---------------------------------------------------------------------------

type MergeFn<R, D> = Box<dyn FnOnce(&PanelState<R, D>) -> PanelPatch<R, D> + Send>;

/// The two accepted forms of a slot write.
pub enum SlotUpdate<R, D> {
    Replace(PanelState<R, D>),
    Merge(MergeFn<R, D>),
}

impl<R, D> SlotUpdate<R, D> {
    pub fn merge<F>(f: F) -> Self
    where
        F: FnOnce(&PanelState<R, D>) -> PanelPatch<R, D> + Send + 'static,
    {
        Self::Merge(Box::new(f))
    }
}

impl<R, D> fmt::Debug for SlotUpdate<R, D>
where
    R: fmt::Debug,
    D: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(state) => f.debug_tuple("Replace").field(state).finish(),
            Self::Merge(_) => f.write_str("Merge(..)"),
        }
    }
}

/// One panel's state plus a revision counter bumped on every applied write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelSlot<R, D> {
    state: PanelState<R, D>,
    revision: u64,
}

impl<R, D> PanelSlot<R, D> {
    #[must_use]
    pub fn state(&self) -> &PanelState<R, D> {
        &self.state
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn update(&mut self, update: SlotUpdate<R, D>) {
        match update {
            SlotUpdate::Replace(state) => self.state = state,
            SlotUpdate::Merge(f) => {
                let patch = f(&self.state);
                self.state.apply(patch);
            }
        }
        self.revision += 1;
    }

    /// Merge a patch computed from the current state.
    pub fn merge_with<F>(&mut self, f: F)
    where
        F: FnOnce(&PanelState<R, D>) -> PanelPatch<R, D>,
    {
        let patch = f(&self.state);
        self.state.apply(patch);
        self.revision += 1;
    }

    pub fn merge(&mut self, patch: PanelPatch<R, D>) {
        self.merge_with(|_| patch);
    }

    pub fn replace(&mut self, state: PanelState<R, D>) {
        self.update(SlotUpdate::Replace(state));
    }
}

impl<R: Clone, D: Clone> PanelSlot<R, D> {
    /// Current state by value, as handed to a panel renderer.
    #[must_use]
    pub fn snapshot(&self) -> PanelState<R, D> {
        self.state.clone()
    }
}

// ---------------------------------------------------------------------------
// Draft input
// ---------------------------------------------------------------------------

/// File chosen for the daily report upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl SelectedFile {
    #[must_use]
    pub fn is_csv(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".csv")
    }

    /// Size in KiB with two decimals, as shown next to the file name.
    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size_bytes as f64 / 1024.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileDraft {
    pub selected: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkDraft {
    pub action: Option<BulkAction>,
    /// Raw multi-line text, one document number per line.
    pub document_text: String,
}

/// Where the last Excel export was written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SavedDownload {
    pub path: PathBuf,
    pub bytes: u64,
}

pub type DataEntrySlot = PanelSlot<DataEntryResult, ()>;
pub type DailyReportSlot = PanelSlot<DailyReportResult, FileDraft>;
pub type MrtSlot = PanelSlot<MrtResult, ()>;
pub type LetterSlot = PanelSlot<LetterResult, ()>;
pub type EmailSlot = PanelSlot<EmailResult, ()>;
pub type MoveCaseStatusSlot = PanelSlot<CaseStatusResult, BulkDraft>;
/// Letter Excel export; `loading` here is the `downloading` flag and is
/// independent of the letter panel's own `loading`.
pub type DownloadSlot = PanelSlot<SavedDownload, ()>;

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// All panel slots, owned for the lifetime of the tab host.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    pub data_entry: DataEntrySlot,
    pub daily_report: DailyReportSlot,
    pub mrt: MrtSlot,
    pub letter: LetterSlot,
    pub letter_download: DownloadSlot,
    pub email: EmailSlot,
    pub move_case_status: MoveCaseStatusSlot,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_loading(&self, panel: PanelKind) -> bool {
        match panel {
            PanelKind::DataEntry => self.data_entry.state().loading,
            PanelKind::DailyReport => self.daily_report.state().loading,
            PanelKind::Mrt => self.mrt.state().loading,
            PanelKind::Letter => self.letter.state().loading,
            PanelKind::Email => self.email.state().loading,
            PanelKind::MoveCaseStatus => self.move_case_status.state().loading,
        }
    }

    #[must_use]
    pub fn error(&self, panel: PanelKind) -> Option<&str> {
        match panel {
            PanelKind::DataEntry => self.data_entry.state().error.as_deref(),
            PanelKind::DailyReport => self.daily_report.state().error.as_deref(),
            PanelKind::Mrt => self.mrt.state().error.as_deref(),
            PanelKind::Letter => self.letter.state().error.as_deref(),
            PanelKind::Email => self.email.state().error.as_deref(),
            PanelKind::MoveCaseStatus => self.move_case_status.state().error.as_deref(),
        }
    }

    #[must_use]
    pub fn phase(&self, panel: PanelKind) -> Phase {
        match panel {
            PanelKind::DataEntry => self.data_entry.state().phase(),
            PanelKind::DailyReport => self.daily_report.state().phase(),
            PanelKind::Mrt => self.mrt.state().phase(),
            PanelKind::Letter => self.letter.state().phase(),
            PanelKind::Email => self.email.state().phase(),
            PanelKind::MoveCaseStatus => self.move_case_status.state().phase(),
        }
    }

    #[must_use]
    pub fn revision(&self, panel: PanelKind) -> u64 {
        match panel {
            PanelKind::DataEntry => self.data_entry.revision(),
            PanelKind::DailyReport => self.daily_report.revision(),
            PanelKind::Mrt => self.mrt.revision(),
            PanelKind::Letter => self.letter.revision(),
            PanelKind::Email => self.email.revision(),
            PanelKind::MoveCaseStatus => self.move_case_status.revision(),
        }
    }

    /// Current result of `panel` wrapped in its tagged variant.
    #[must_use]
    pub fn result(&self, panel: PanelKind) -> Option<OperationResult> {
        match panel {
            PanelKind::DataEntry => self
                .data_entry
                .state()
                .result
                .clone()
                .map(OperationResult::DataEntry),
            PanelKind::DailyReport => self
                .daily_report
                .state()
                .result
                .clone()
                .map(OperationResult::DailyReport),
            PanelKind::Mrt => self.mrt.state().result.clone().map(OperationResult::Mrt),
            PanelKind::Letter => self
                .letter
                .state()
                .result
                .clone()
                .map(OperationResult::Letter),
            PanelKind::Email => self
                .email
                .state()
                .result
                .clone()
                .map(OperationResult::Email),
            PanelKind::MoveCaseStatus => self
                .move_case_status
                .state()
                .result
                .clone()
                .map(OperationResult::CaseStatus),
        }
    }

    /// Dispatch-start merge for `panel`.
    pub fn begin(&mut self, panel: PanelKind) {
        match panel {
            PanelKind::DataEntry => self.data_entry.merge(PanelPatch::dispatch_start()),
            PanelKind::DailyReport => self.daily_report.merge(PanelPatch::dispatch_start()),
            PanelKind::Mrt => self.mrt.merge(PanelPatch::dispatch_start()),
            PanelKind::Letter => self.letter.merge(PanelPatch::dispatch_start()),
            PanelKind::Email => self.email.merge(PanelPatch::dispatch_start()),
            PanelKind::MoveCaseStatus => {
                self.move_case_status.merge(PanelPatch::dispatch_start())
            }
        }
    }

    /// Show a local validation failure on `panel` without touching draft input.
    pub fn reject(&mut self, panel: PanelKind, message: &str) {
        match panel {
            PanelKind::DataEntry => self.data_entry.merge(PanelPatch::rejected(message)),
            PanelKind::DailyReport => self.daily_report.merge(PanelPatch::rejected(message)),
            PanelKind::Mrt => self.mrt.merge(PanelPatch::rejected(message)),
            PanelKind::Letter => self.letter.merge(PanelPatch::rejected(message)),
            PanelKind::Email => self.email.merge(PanelPatch::rejected(message)),
            PanelKind::MoveCaseStatus => {
                self.move_case_status.merge(PanelPatch::rejected(message))
            }
        }
    }

    /// Dispatch-end merge for a successful response; routes by variant.
    pub fn settle_success(&mut self, result: OperationResult) {
        match result {
            OperationResult::DataEntry(r) => self.data_entry.merge(PanelPatch::success(r)),
            OperationResult::DailyReport(r) => self.daily_report.merge(PanelPatch::success(r)),
            OperationResult::Mrt(r) => self.mrt.merge(PanelPatch::success(r)),
            OperationResult::Letter(r) => self.letter.merge(PanelPatch::success(r)),
            OperationResult::Email(r) => self.email.merge(PanelPatch::success(r)),
            OperationResult::CaseStatus(r) => {
                self.move_case_status.merge(PanelPatch::success(r))
            }
        }
    }

    /// Dispatch-end merge for a failed request.
    pub fn settle_failure(&mut self, panel: PanelKind, message: &str) {
        match panel {
            PanelKind::DataEntry => self.data_entry.merge(PanelPatch::failure(message)),
            PanelKind::DailyReport => self.daily_report.merge(PanelPatch::failure(message)),
            PanelKind::Mrt => self.mrt.merge(PanelPatch::failure(message)),
            PanelKind::Letter => self.letter.merge(PanelPatch::failure(message)),
            PanelKind::Email => self.email.merge(PanelPatch::failure(message)),
            PanelKind::MoveCaseStatus => {
                self.move_case_status.merge(PanelPatch::failure(message))
            }
        }
    }
}
