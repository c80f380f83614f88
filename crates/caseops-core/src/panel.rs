//! Operation panel identities.
//!
//! Each panel is one tab of the dashboard with its own state slot, trigger
//! endpoint and operation-specific fallback error text.

use serde::{Deserialize, Serialize};

/// The six operation panels hosted by the dashboard, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    DataEntry,
    DailyReport,
    Mrt,
    Letter,
    Email,
    MoveCaseStatus,
}

impl PanelKind {
    pub const ORDER: [PanelKind; 6] = [
        PanelKind::DataEntry,
        PanelKind::DailyReport,
        PanelKind::Mrt,
        PanelKind::Letter,
        PanelKind::Email,
        PanelKind::MoveCaseStatus,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DataEntry => "Data Entry Waiting Cases",
            Self::DailyReport => "Daily Report Monitoring",
            Self::Mrt => "MRT & GIACT Processing",
            Self::Letter => "Letter Generation Processing",
            Self::Email => "Email Processing",
            Self::MoveCaseStatus => "Move Case Status",
        }
    }

    /// Compact label used in the tab bar.
    #[must_use]
    pub fn short_label(self) -> &'static str {
        match self {
            Self::DataEntry => "Data Entry",
            Self::DailyReport => "Daily Report",
            Self::Mrt => "MRT & GIACT",
            Self::Letter => "Letters",
            Self::Email => "Email",
            Self::MoveCaseStatus => "Move Status",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataEntry => "data-entry",
            Self::DailyReport => "daily-report",
            Self::Mrt => "mrt",
            Self::Letter => "letter",
            Self::Email => "email",
            Self::MoveCaseStatus => "move-case-status",
        }
    }

    /// Endpoint path for the panel's trigger. The bulk-move panel has no
    /// fixed endpoint; its selected action carries one.
    #[must_use]
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            Self::DataEntry => Some("/api/cases/process-dataentry-waiting"),
            Self::DailyReport => Some("/api/daily-report/upload"),
            Self::Mrt => Some("/api/mrt/process"),
            Self::Letter => Some("/api/letter/process"),
            Self::Email => Some("/api/email/process"),
            Self::MoveCaseStatus => None,
        }
    }

    /// Last-resort error text when neither the server nor the transport
    /// produced a readable message.
    #[must_use]
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::DataEntry => "Failed to process cases",
            Self::DailyReport => "Failed to process daily report",
            Self::Mrt => "Failed to process MRT cases",
            Self::Letter => "Failed to process letter cases",
            Self::Email => "Failed to process email cases",
            Self::MoveCaseStatus => "Failed to update case status",
        }
    }

    /// Tab position (0-based).
    #[must_use]
    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0)
    }

    /// Cycle through tabs, wrapping at both ends.
    #[must_use]
    pub fn cycle(self, delta: i32) -> Self {
        let len = Self::ORDER.len() as i32;
        let next = (self.index() as i32 + delta).rem_euclid(len);
        Self::ORDER[next as usize]
    }

    /// Map a `1`..`6` digit key to its tab.
    #[must_use]
    pub fn from_digit(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)? as usize;
        if digit == 0 {
            return None;
        }
        Self::ORDER.get(digit - 1).copied()
    }
}

/// Endpoint for the letter Excel export.
pub const LETTER_EXCEL_ENDPOINT: &str = "/api/letter/process/excel";

/// Filename used when the export response carries no disposition header.
pub const DEFAULT_LETTER_EXCEL_FILENAME: &str = "letter_generation_data.xlsx";

/// Fallback text for a failed Excel export.
pub const DOWNLOAD_FALLBACK_ERROR: &str = "Failed to download Excel file";

/// Liveness probe exposed by the case processing service.
pub const HEALTH_ENDPOINT: &str = "/api/cases/health";
