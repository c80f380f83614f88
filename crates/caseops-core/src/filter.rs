//! Client-side search over operation result records.
//!
//! A query matches a record when any of the record's search fields contains
//! the trimmed query, ignoring case. Absent fields never match.

use std::borrow::Cow;

use crate::model::{CaseDetail, DocumentOutcome, LetterRow};

/// A record type with a fixed set of searchable fields.
pub trait Searchable {
    /// `needle` is already trimmed and lowercased and never empty.
    fn matches_query(&self, needle: &str) -> bool;
}

/// Normalize a raw query. An empty result means "no filter".
#[must_use]
pub fn normalize_query(query: &str) -> String {
    fold_case(query.trim())
}

/// Lowercase each character on its own. Unlike `str::to_lowercase` this has
/// no word-final sigma rule, so folding commutes with taking substrings.
#[must_use]
pub fn fold_case(value: &str) -> String {
    value.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive containment for one optional field.
#[must_use]
pub fn field_contains(field: Option<&str>, needle: &str) -> bool {
    match field {
        Some(value) => fold_case(value).contains(needle),
        None => false,
    }
}

fn any_field_contains(fields: &[Option<&str>], needle: &str) -> bool {
    fields
        .iter()
        .any(|field| field_contains(*field, needle))
}

/// Records matching `query`, in input order.
///
/// A blank query returns the input slice itself, borrowed.
pub fn filter_records<'a, T>(records: &'a [T], query: &str) -> Cow<'a, [T]>
where
    T: Searchable + Clone,
{
    filter_records_by(records, query, T::matches_query)
}

/// Like [`filter_records`] but with an explicit matcher, for record types
/// searched on different fields depending on where they are shown.
pub fn filter_records_by<'a, T, F>(records: &'a [T], query: &str, matcher: F) -> Cow<'a, [T]>
where
    T: Clone,
    F: Fn(&T, &str) -> bool,
{
    let needle = normalize_query(query);
    if needle.is_empty() {
        return Cow::Borrowed(records);
    }
    Cow::Owned(
        records
            .iter()
            .filter(|record| matcher(record, &needle))
            .cloned()
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Searchable impls
// ---------------------------------------------------------------------------

impl Searchable for String {
    fn matches_query(&self, needle: &str) -> bool {
        field_contains(Some(self), needle)
    }
}

/// Data-entry detail rows search the broad field set.
impl Searchable for CaseDetail {
    fn matches_query(&self, needle: &str) -> bool {
        any_field_contains(
            &[
                self.case_reference.as_deref(),
                self.case_id.as_deref(),
                self.document_number.as_deref(),
                self.status.as_deref(),
                self.action.as_deref(),
                self.message.as_deref(),
                self.review_reason.as_deref(),
            ],
            needle,
        )
    }
}

/// Daily-report detail rows search by document number, case id and client code.
#[must_use]
pub fn daily_report_detail_matches(detail: &CaseDetail, needle: &str) -> bool {
    any_field_contains(
        &[
            detail.document_number.as_deref(),
            detail.case_id.as_deref(),
            detail.client_code.as_deref(),
        ],
        needle,
    )
}

impl Searchable for LetterRow {
    fn matches_query(&self, needle: &str) -> bool {
        any_field_contains(
            &[
                self.correspondence_correlation_id.as_deref(),
                self.document_number.as_deref(),
                self.carrier.as_deref(),
                self.contract_number.as_deref(),
                self.delivery_type.as_deref(),
                self.xml_file_name.as_deref(),
            ],
            needle,
        )
    }
}

impl Searchable for DocumentOutcome {
    fn matches_query(&self, needle: &str) -> bool {
        any_field_contains(
            &[
                Some(self.document_number.as_str()),
                self.reason.as_deref(),
                self.osc_type.as_deref(),
            ],
            needle,
        )
    }
}

// ---------------------------------------------------------------------------
// FilterView
// ---------------------------------------------------------------------------

/// What a filtered list should tell the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterView {
    /// No query; every record is shown.
    Unfiltered { total: usize },
    Matches { shown: usize, total: usize },
    /// A query is active and nothing matched.
    NoMatches { query: String },
    /// The operation itself returned nothing.
    EmptyResult,
}

impl FilterView {
    #[must_use]
    pub fn classify(total: usize, shown: usize, query: &str) -> Self {
        let trimmed = query.trim();
        if total == 0 {
            Self::EmptyResult
        } else if trimmed.is_empty() {
            Self::Unfiltered { total }
        } else if shown == 0 {
            Self::NoMatches {
                query: trimmed.to_owned(),
            }
        } else {
            Self::Matches { shown, total }
        }
    }

    /// `Showing N of M` when a filter is narrowing a non-empty list.
    #[must_use]
    pub fn showing_line(&self) -> Option<String> {
        match self {
            Self::Matches { shown, total } => Some(format!("Showing {shown} of {total}")),
            _ => None,
        }
    }
}
