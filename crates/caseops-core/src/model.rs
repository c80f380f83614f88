//! Operation result documents returned by the case processing backend.
//!
//! One variant per panel. Every field is optional on the wire: absent or
//! `null` counters decode to zero and absent or `null` lists decode to empty,
//! so a partially populated error-path body still yields a usable result.

use serde::{Deserialize, Deserializer, Serialize};

use crate::panel::PanelKind;

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Shared record shapes
// ---------------------------------------------------------------------------

/// Per-case outcome row produced by the data-entry and daily-report runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseDetail {
    pub case_reference: Option<String>,
    pub case_id: Option<String>,
    pub client_code: Option<String>,
    pub document_number: Option<String>,
    pub onbase_status: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub action: Option<String>,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub requires_manual_review: bool,
    pub review_reason: Option<String>,
    pub bpm_follow_up_status: Option<String>,
}

/// One document in a bulk status-move response.
///
/// The backend sends these either as a bare document number or as an object
/// with a reason (failures) and an OSC type (create-OSC entries); both forms
/// decode into this one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawDocument")]
pub struct DocumentOutcome {
    pub document_number: String,
    pub reason: Option<String>,
    pub osc_type: Option<String>,
}

impl DocumentOutcome {
    #[must_use]
    pub fn bare(document_number: impl Into<String>) -> Self {
        Self {
            document_number: document_number.into(),
            reason: None,
            osc_type: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Bare(String),
    Detailed {
        #[serde(rename = "documentNumber", default)]
        document_number: Option<String>,
        #[serde(default)]
        reason: Option<String>,
        #[serde(rename = "oscType", default)]
        osc_type: Option<String>,
    },
}

impl From<RawDocument> for DocumentOutcome {
    fn from(raw: RawDocument) -> Self {
        match raw {
            RawDocument::Bare(document_number) => Self::bare(document_number),
            RawDocument::Detailed {
                document_number,
                reason,
                osc_type,
            } => Self {
                document_number: document_number.unwrap_or_default(),
                reason,
                osc_type,
            },
        }
    }
}

/// Named summary integer shown in a panel's stat row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub label: &'static str,
    pub value: u64,
}

impl Counter {
    const fn new(label: &'static str, value: u64) -> Self {
        Self { label, value }
    }
}

/// Named list of document identifiers grouped by disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket<'a> {
    pub label: &'static str,
    pub entries: &'a [String],
    pub empty_text: &'static str,
}

/// The four disposition buckets shared by data-entry and daily-report runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DispositionBuckets {
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_to_cancel: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_to_returning: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_to_complete: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_for_manual_review: Vec<String>,
}

impl DispositionBuckets {
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket<'_>> {
        vec![
            Bucket {
                label: "To Cancel",
                entries: &self.document_numbers_to_cancel,
                empty_text: "No documents to cancel",
            },
            Bucket {
                label: "To Returning",
                entries: &self.document_numbers_to_returning,
                empty_text: "No returning documents",
            },
            Bucket {
                label: "To Complete",
                entries: &self.document_numbers_to_complete,
                empty_text: "No documents to complete",
            },
            Bucket {
                label: "Manual Review",
                entries: &self.document_numbers_for_manual_review,
                empty_text: "No manual review needed",
            },
        ]
    }
}

// ---------------------------------------------------------------------------
// Per-panel results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataEntryResult {
    #[serde(deserialize_with = "nullable")]
    pub total_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub successful_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub failed_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub manual_review_required: u64,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub details: Vec<CaseDetail>,
    #[serde(flatten)]
    pub buckets: DispositionBuckets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyReportResult {
    #[serde(deserialize_with = "nullable")]
    pub total_rows_in_csv: u64,
    #[serde(deserialize_with = "nullable")]
    pub not_matching_rows: u64,
    #[serde(deserialize_with = "nullable")]
    pub processed_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub successful_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub failed_cases: u64,
    #[serde(deserialize_with = "nullable")]
    pub manual_review_required: u64,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub business_keys_extracted: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub details: Vec<CaseDetail>,
    #[serde(flatten)]
    pub buckets: DispositionBuckets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MrtResult {
    #[serde(deserialize_with = "nullable")]
    pub total_cases_processed: u64,
    #[serde(deserialize_with = "nullable")]
    pub cases_with_complete_tasks_and_event: u64,
    #[serde(deserialize_with = "nullable")]
    pub cases_with_complete_tasks_and_event_list: Vec<String>,
    pub message: Option<String>,
}

/// One letter-generation process row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterRow {
    pub correspondence_correlation_id: Option<String>,
    pub document_number: Option<String>,
    pub carrier: Option<String>,
    pub contract_number: Option<String>,
    pub delivery_type: Option<String>,
    pub xml_file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterResult {
    #[serde(deserialize_with = "nullable")]
    pub total_processed: u64,
    #[serde(deserialize_with = "nullable")]
    pub carrier_found: u64,
    #[serde(deserialize_with = "nullable")]
    pub contract_number_found: u64,
    #[serde(deserialize_with = "nullable")]
    pub delivery_type_found: u64,
    #[serde(deserialize_with = "nullable")]
    pub xml_file_name_found: u64,
    pub excel_file_name: Option<String>,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub data: Vec<LetterRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailResult {
    #[serde(deserialize_with = "nullable")]
    pub total_cases: u64,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_to_complete: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_to_cancel: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_numbers_for_manual_review: Vec<String>,
}

impl EmailResult {
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket<'_>> {
        vec![
            Bucket {
                label: "To DV POST COMPLETE",
                entries: &self.document_numbers_to_complete,
                empty_text: "No documents for DV POST COMPLETE",
            },
            Bucket {
                label: "To Cancel",
                entries: &self.document_numbers_to_cancel,
                empty_text: "No documents to cancel",
            },
            Bucket {
                label: "Manual Review",
                entries: &self.document_numbers_for_manual_review,
                empty_text: "No documents for manual review",
            },
        ]
    }
}

/// Response of the bulk close-follow-up / move-status actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseStatusResult {
    #[serde(deserialize_with = "nullable")]
    pub total_submitted: u64,
    #[serde(deserialize_with = "nullable")]
    pub success_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub failed_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub create_osc_count: u64,
    pub message: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub successful_documents: Vec<DocumentOutcome>,
    #[serde(deserialize_with = "nullable")]
    pub failed_documents: Vec<DocumentOutcome>,
    #[serde(deserialize_with = "nullable")]
    pub create_osc_documents: Vec<DocumentOutcome>,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// Parsed response of one batch action, keyed by the panel that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    DataEntry(DataEntryResult),
    DailyReport(DailyReportResult),
    Mrt(MrtResult),
    Letter(LetterResult),
    Email(EmailResult),
    CaseStatus(CaseStatusResult),
}

impl OperationResult {
    /// Decode a JSON body into the variant owned by `panel`.
    pub fn decode(panel: PanelKind, body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(match panel {
            PanelKind::DataEntry => Self::DataEntry(serde_json::from_slice(body)?),
            PanelKind::DailyReport => Self::DailyReport(serde_json::from_slice(body)?),
            PanelKind::Mrt => Self::Mrt(serde_json::from_slice(body)?),
            PanelKind::Letter => Self::Letter(serde_json::from_slice(body)?),
            PanelKind::Email => Self::Email(serde_json::from_slice(body)?),
            PanelKind::MoveCaseStatus => Self::CaseStatus(serde_json::from_slice(body)?),
        })
    }

    #[must_use]
    pub fn panel(&self) -> PanelKind {
        match self {
            Self::DataEntry(_) => PanelKind::DataEntry,
            Self::DailyReport(_) => PanelKind::DailyReport,
            Self::Mrt(_) => PanelKind::Mrt,
            Self::Letter(_) => PanelKind::Letter,
            Self::Email(_) => PanelKind::Email,
            Self::CaseStatus(_) => PanelKind::MoveCaseStatus,
        }
    }

    /// Advisory message, if the backend supplied a non-blank one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Self::DataEntry(r) => r.message.as_deref(),
            Self::DailyReport(r) => r.message.as_deref(),
            Self::Mrt(r) => r.message.as_deref(),
            Self::Letter(r) => r.message.as_deref(),
            Self::Email(r) => r.message.as_deref(),
            Self::CaseStatus(r) => r.message.as_deref(),
        };
        message.filter(|m| !m.trim().is_empty())
    }

    /// Summary counters in display order.
    #[must_use]
    pub fn counters(&self) -> Vec<Counter> {
        match self {
            Self::DataEntry(r) => vec![
                Counter::new("Total Cases", r.total_cases),
                Counter::new("Successful", r.successful_cases),
                Counter::new("Failed", r.failed_cases),
                Counter::new("Manual Review", r.manual_review_required),
            ],
            Self::DailyReport(r) => vec![
                Counter::new("Total Rows", r.total_rows_in_csv),
                Counter::new("Not Matching", r.not_matching_rows),
                Counter::new("Cases Processed", r.processed_cases),
                Counter::new("Successful", r.successful_cases),
            ],
            Self::Mrt(r) => vec![
                Counter::new("Total Cases Processed", r.total_cases_processed),
                Counter::new(
                    "Complete Tasks & Event",
                    r.cases_with_complete_tasks_and_event,
                ),
            ],
            Self::Letter(r) => vec![
                Counter::new("Total Processed", r.total_processed),
                Counter::new("CARRIER Found", r.carrier_found),
                Counter::new("CONTRACT_NUMBER", r.contract_number_found),
                Counter::new("deliveryType", r.delivery_type_found),
            ],
            Self::Email(r) => vec![
                Counter::new("Total Cases", r.total_cases),
                Counter::new(
                    "To DV POST COMPLETE",
                    r.document_numbers_to_complete.len() as u64,
                ),
                Counter::new("To Cancel", r.document_numbers_to_cancel.len() as u64),
                Counter::new(
                    "Manual Review",
                    r.document_numbers_for_manual_review.len() as u64,
                ),
            ],
            Self::CaseStatus(r) => vec![
                Counter::new("Total Submitted", r.total_submitted),
                Counter::new("Successful", r.success_count),
                Counter::new("Failed", r.failed_count),
                Counter::new("Create OSC", r.create_osc_count),
            ],
        }
    }
}
