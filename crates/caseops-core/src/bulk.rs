//! Bulk case-status actions and the selector state machine.

use serde::{Deserialize, Serialize};

use crate::state::{BulkDraft, PanelPatch, PanelState};

/// A server-side batch transition applied to a list of document numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkAction {
    CloseFollowUp,
    MoveToReturning,
    MoveToComplete,
}

impl BulkAction {
    pub const ALL: [BulkAction; 3] = [
        BulkAction::CloseFollowUp,
        BulkAction::MoveToReturning,
        BulkAction::MoveToComplete,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::CloseFollowUp => "closeBpmFollowUp",
            Self::MoveToReturning => "moveToCpReturning",
            Self::MoveToComplete => "moveToDvPostComplete",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::CloseFollowUp => "Close BPM Follow Up Task for Documents",
            Self::MoveToReturning => "Move Case to CP Returning",
            Self::MoveToComplete => "Move Case to DV Post Complete",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::CloseFollowUp => "Close BPM follow-up tasks for the listed documents",
            Self::MoveToReturning => "Move the listed documents' cases to CP Returning",
            Self::MoveToComplete => "Move the listed documents' cases to DV Post Complete",
        }
    }

    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::CloseFollowUp => "/api/case/status/close/followup",
            Self::MoveToReturning => "/api/case/status/move/returning",
            Self::MoveToComplete => "/api/case/status/move/complete",
        }
    }

    /// `Failed to <title lowercased>`.
    #[must_use]
    pub fn fallback_error(self) -> String {
        format!("Failed to {}", self.title().to_lowercase())
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Next action in list order, wrapping; `None` selects the first.
    #[must_use]
    pub fn cycle(current: Option<Self>, delta: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let idx = match current {
            Some(action) => Self::ALL
                .iter()
                .position(|candidate| *candidate == action)
                .map_or(0, |i| i as i32 + delta),
            None => 0,
        };
        Self::ALL[idx.rem_euclid(len) as usize]
    }
}

/// Split operator text into document numbers: one per line, trimmed, blank
/// lines dropped.
#[must_use]
pub fn parse_document_numbers(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Selector states derived from the bulk panel's slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkPhase {
    NoActionSelected,
    ActionSelected(BulkAction),
    Submitting(BulkAction),
    SettledSuccess(BulkAction),
    SettledError(BulkAction),
}

impl BulkPhase {
    #[must_use]
    pub fn of<R>(state: &PanelState<R, BulkDraft>) -> Self {
        let Some(action) = state.draft.action else {
            return Self::NoActionSelected;
        };
        if state.loading {
            Self::Submitting(action)
        } else if state.error.is_some() {
            Self::SettledError(action)
        } else if state.result.is_some() {
            Self::SettledSuccess(action)
        } else {
            Self::ActionSelected(action)
        }
    }

    /// Whether a submit may be attempted. The document list is checked
    /// separately at submit time.
    #[must_use]
    pub fn can_submit(self) -> bool {
        !matches!(self, Self::NoActionSelected | Self::Submitting(_))
    }
}

/// Patch for choosing an action: clears result and error, keeps document text.
#[must_use]
pub fn select_action_patch<R>(
    state: &PanelState<R, BulkDraft>,
    action: BulkAction,
) -> PanelPatch<R, BulkDraft> {
    PanelPatch::new()
        .draft(BulkDraft {
            action: Some(action),
            document_text: state.draft.document_text.clone(),
        })
        .result(None)
        .error(None)
}

/// Patch for the reset control: clears action, text, result and error.
#[must_use]
pub fn reset_patch<R>() -> PanelPatch<R, BulkDraft> {
    PanelPatch::new()
        .draft(BulkDraft::default())
        .result(None)
        .error(None)
}
