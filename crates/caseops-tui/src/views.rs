//! Panel content as styled text lines.
//!
//! Each panel renders from its own slot only. Record lists pass through the
//! filter engine with the host's current query; a query that hides every
//! record reads differently from an operation that returned none.

use caseops_core::bulk::{parse_document_numbers, BulkAction, BulkPhase};
use caseops_core::filter::{daily_report_detail_matches, filter_records_by, FilterView, Searchable};
use caseops_core::model::{Bucket, CaseDetail, Counter, DocumentOutcome, LetterRow, OperationResult};
use caseops_core::panel::PanelKind;
use caseops_core::state::StateStore;
use caseops_tui_adapter::render::TextRole;
use caseops_tui_adapter::widgets::{
    case_detail_columns, daily_report_columns, document_outcome_columns, format_header,
    format_row, letter_columns, TableColumnSpec,
};

/// Shown when a table-shaped result list came back empty.
pub const EMPTY_RESULT_TEXT: &str = "Operation returned no records";

/// Shown when the MRT run found nothing to list.
pub const MRT_EMPTY_TEXT: &str = "No cases with complete tasks and event received";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub role: TextRole,
}

impl Line {
    fn new(text: impl Into<String>, role: TextRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    fn blank() -> Self {
        Self::new("", TextRole::Primary)
    }
}

/// Host-owned inputs a panel view needs besides its slot.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub query: &'a str,
    pub spinner: char,
    pub editing_documents: bool,
    /// Path being typed for the daily report upload, if that prompt is open.
    pub file_path_input: Option<&'a str>,
}

/// Content lines for `panel`, top to bottom.
#[must_use]
pub fn panel_lines(store: &StateStore, panel: PanelKind, ctx: &ViewContext<'_>) -> Vec<Line> {
    let mut lines = vec![Line::new(description(panel), TextRole::Muted), Line::blank()];
    match panel {
        PanelKind::DataEntry => data_entry_lines(&mut lines, store, ctx),
        PanelKind::DailyReport => daily_report_lines(&mut lines, store, ctx),
        PanelKind::Mrt => mrt_lines(&mut lines, store, ctx),
        PanelKind::Letter => letter_lines(&mut lines, store, ctx),
        PanelKind::Email => email_lines(&mut lines, store, ctx),
        PanelKind::MoveCaseStatus => bulk_lines(&mut lines, store, ctx),
    }
    lines
}

fn description(panel: PanelKind) -> &'static str {
    match panel {
        PanelKind::DataEntry => {
            "Process data entry waiting cases, check OnBase status and flag cases for manual review."
        }
        PanelKind::DailyReport => {
            "Upload the daily report CSV to monitor and process non-matching cases."
        }
        PanelKind::Mrt => {
            "Process MRT waiting cases and collect cases with complete tasks and event received."
        }
        PanelKind::Letter => {
            "Process letter waiting cases and fetch letter generation variables per correlation ID."
        }
        PanelKind::Email => "Process email waiting cases and sort documents by disposition.",
        PanelKind::MoveCaseStatus => {
            "Select an action and provide document numbers to update case statuses in bulk."
        }
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

fn trigger_line(loading: bool, spinner: char, key: &str, label: &str) -> Line {
    if loading {
        Line::new(format!("{spinner} Processing..."), TextRole::Muted)
    } else {
        Line::new(format!("[{key}] {label}"), TextRole::Accent)
    }
}

fn push_error(lines: &mut Vec<Line>, error: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::blank());
        lines.push(Line::new(format!("✗ {error}"), TextRole::Danger));
    }
}

fn counters_text(counters: &[Counter]) -> String {
    counters
        .iter()
        .map(|counter| format!("{}: {}", counter.label, counter.value))
        .collect::<Vec<_>>()
        .join("   ")
}

fn push_summary(lines: &mut Vec<Line>, result: &OperationResult) {
    lines.push(Line::blank());
    lines.push(Line::new(counters_text(&result.counters()), TextRole::Primary));
    if let Some(message) = result.message() {
        lines.push(Line::new(format!("ℹ {}", message.trim()), TextRole::Info));
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// A titled, filtered record list.
struct Section<'a, T> {
    title: &'a str,
    records: &'a [T],
    empty_text: &'a str,
    columns: Option<&'a [TableColumnSpec]>,
}

fn push_section<T, M, R>(lines: &mut Vec<Line>, query: &str, section: Section<'_, T>, matcher: M, row: R)
where
    T: Clone,
    M: Fn(&T, &str) -> bool,
    R: Fn(&T) -> String,
{
    let shown = filter_records_by(section.records, query, matcher);
    let view = FilterView::classify(section.records.len(), shown.len(), query);

    lines.push(Line::blank());
    lines.push(Line::new(
        format!("{} ({})", section.title, section.records.len()),
        TextRole::Accent,
    ));
    match &view {
        FilterView::EmptyResult => {
            lines.push(Line::new(format!("  {}", section.empty_text), TextRole::Muted));
        }
        FilterView::NoMatches { query } => {
            lines.push(Line::new(
                format!("  No records match \"{query}\""),
                TextRole::Warning,
            ));
        }
        FilterView::Unfiltered { .. } | FilterView::Matches { .. } => {
            if let Some(showing) = view.showing_line() {
                lines.push(Line::new(format!("  {showing}"), TextRole::Muted));
            }
            if let Some(columns) = section.columns {
                lines.push(Line::new(format!("  {}", format_header(columns)), TextRole::Muted));
            }
            lines.extend(
                shown
                    .iter()
                    .map(|record| Line::new(format!("  {}", row(record)), TextRole::Primary)),
            );
        }
    }
}

fn push_bucket(lines: &mut Vec<Line>, query: &str, bucket: Bucket<'_>) {
    push_section(
        lines,
        query,
        Section {
            title: bucket.label,
            records: bucket.entries,
            empty_text: bucket.empty_text,
            columns: None,
        },
        String::matches_query,
        String::clone,
    );
}

fn case_detail_row(detail: &CaseDetail) -> String {
    let review = manual_review_label(detail);
    format_row(
        &case_detail_columns(),
        &[
            opt(&detail.case_reference),
            opt(&detail.case_id),
            opt(&detail.document_number),
            opt(&detail.status),
            opt(&detail.action),
            review.as_str(),
            opt(&detail.message),
        ],
    )
}

/// `No`, or the review reason when a manual review is required.
fn manual_review_label(detail: &CaseDetail) -> String {
    if !detail.requires_manual_review {
        return "No".to_owned();
    }
    match detail.review_reason.as_deref().map(str::trim) {
        Some(reason) if !reason.is_empty() => reason.to_owned(),
        _ => "Required".to_owned(),
    }
}

fn daily_detail_row(detail: &CaseDetail) -> String {
    format_row(
        &daily_report_columns(),
        &[
            opt(&detail.document_number),
            opt(&detail.case_id),
            opt(&detail.client_code),
            opt(&detail.onbase_status),
            opt(&detail.category),
            opt(&detail.status),
            opt(&detail.message),
        ],
    )
}

fn letter_row(row: &LetterRow) -> String {
    format_row(
        &letter_columns(),
        &[
            opt(&row.document_number),
            opt(&row.correspondence_correlation_id),
            opt(&row.carrier),
            opt(&row.contract_number),
            opt(&row.delivery_type),
            opt(&row.xml_file_name),
        ],
    )
}

fn outcome_row(outcome: &DocumentOutcome) -> String {
    format_row(
        &document_outcome_columns(),
        &[
            outcome.document_number.as_str(),
            opt(&outcome.osc_type),
            opt(&outcome.reason),
        ],
    )
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

fn data_entry_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.data_entry.state();
    lines.push(trigger_line(state.loading, ctx.spinner, "Enter", "Process Cases"));
    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::DataEntry(result.clone()));
    for bucket in result.buckets.buckets() {
        push_bucket(lines, ctx.query, bucket);
    }
    let columns = case_detail_columns();
    push_section(
        lines,
        ctx.query,
        Section {
            title: "Case Details",
            records: &result.details,
            empty_text: EMPTY_RESULT_TEXT,
            columns: Some(&columns),
        },
        CaseDetail::matches_query,
        case_detail_row,
    );
}

fn daily_report_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.daily_report.state();
    match &state.draft.selected {
        Some(file) => lines.push(Line::new(
            format!("File: {} ({})", file.name, file.size_label()),
            TextRole::Primary,
        )),
        None => lines.push(Line::new("File: none selected", TextRole::Muted)),
    }
    match ctx.file_path_input {
        Some(input) => lines.push(Line::new(format!("CSV path: {input}_"), TextRole::Focus)),
        None if !state.loading => lines.push(Line::new("[f] Choose CSV file", TextRole::Accent)),
        None => {}
    }
    lines.push(trigger_line(state.loading, ctx.spinner, "Enter", "Upload & Process"));
    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::DailyReport(result.clone()));
    push_section(
        lines,
        ctx.query,
        Section {
            title: "Business Keys Extracted",
            records: &result.business_keys_extracted,
            empty_text: EMPTY_RESULT_TEXT,
            columns: None,
        },
        String::matches_query,
        String::clone,
    );
    for bucket in result.buckets.buckets() {
        push_bucket(lines, ctx.query, bucket);
    }
    let columns = daily_report_columns();
    push_section(
        lines,
        ctx.query,
        Section {
            title: "Case Details",
            records: &result.details,
            empty_text: EMPTY_RESULT_TEXT,
            columns: Some(&columns),
        },
        daily_report_detail_matches,
        daily_detail_row,
    );
}

fn mrt_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.mrt.state();
    lines.push(trigger_line(state.loading, ctx.spinner, "Enter", "Process Cases"));
    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::Mrt(result.clone()));
    push_section(
        lines,
        ctx.query,
        Section {
            title: "Cases With Complete Tasks & Event",
            records: &result.cases_with_complete_tasks_and_event_list,
            empty_text: MRT_EMPTY_TEXT,
            columns: None,
        },
        String::matches_query,
        String::clone,
    );
}

fn letter_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.letter.state();
    let download = store.letter_download.state();
    let busy = state.loading || download.loading;

    if state.loading || !busy {
        lines.push(trigger_line(state.loading, ctx.spinner, "Enter", "Process Cases"));
    } else {
        lines.push(Line::new("Process Cases (busy)", TextRole::Muted));
    }
    if download.loading {
        lines.push(Line::new(format!("{} Generating...", ctx.spinner), TextRole::Muted));
    } else if busy {
        lines.push(Line::new("Process & Download Excel (busy)", TextRole::Muted));
    } else {
        lines.push(Line::new("[d] Process & Download Excel", TextRole::Accent));
    }
    if let Some(error) = &download.error {
        lines.push(Line::new(format!("✗ {error}"), TextRole::Danger));
    } else if let Some(saved) = &download.result {
        lines.push(Line::new(
            format!("Saved {} ({} bytes)", saved.path.display(), saved.bytes),
            TextRole::Success,
        ));
    }

    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::Letter(result.clone()));
    lines.push(Line::new(
        format!("XML_FILE_NAME Found: {}", result.xml_file_name_found),
        TextRole::Primary,
    ));
    if let Some(name) = result.excel_file_name.as_deref().filter(|n| !n.trim().is_empty()) {
        lines.push(Line::new(format!("Excel file: {name}"), TextRole::Muted));
    }
    let columns = letter_columns();
    push_section(
        lines,
        ctx.query,
        Section {
            title: "Letter Generation Data",
            records: &result.data,
            empty_text: EMPTY_RESULT_TEXT,
            columns: Some(&columns),
        },
        LetterRow::matches_query,
        letter_row,
    );
}

fn email_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.email.state();
    lines.push(trigger_line(state.loading, ctx.spinner, "Enter", "Process Cases"));
    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::Email(result.clone()));
    for bucket in result.buckets() {
        push_bucket(lines, ctx.query, bucket);
    }
}

fn bulk_lines(lines: &mut Vec<Line>, store: &StateStore, ctx: &ViewContext<'_>) {
    let state = store.move_case_status.state();
    let draft = &state.draft;

    lines.push(Line::new("Select Action  [←/→] choose", TextRole::Accent));
    for action in BulkAction::ALL {
        let selected = draft.action == Some(action);
        let (marker, role) = if selected {
            ("(•)", TextRole::Focus)
        } else {
            ("( )", TextRole::Primary)
        };
        lines.push(Line::new(format!("{marker} {}", action.title()), role));
        lines.push(Line::new(format!("    {}", action.description()), TextRole::Muted));
    }

    let phase = BulkPhase::of(state);
    match draft.action {
        None => {
            lines.push(Line::blank());
            lines.push(Line::new(
                "Choose an action to enter document numbers",
                TextRole::Muted,
            ));
        }
        Some(action) => {
            lines.push(Line::blank());
            let heading = if ctx.editing_documents {
                "Document Numbers (editing, Esc to finish)"
            } else {
                "Document Numbers  [e] edit  [x] reset"
            };
            lines.push(Line::new(heading, TextRole::Accent));
            push_document_text(lines, &draft.document_text, ctx.editing_documents);

            let count = parse_document_numbers(&draft.document_text).len();
            lines.push(Line::new(
                format!("{count} document(s) entered"),
                TextRole::Muted,
            ));
            lines.push(submit_line(phase, action, count, ctx.spinner));
        }
    }

    push_error(lines, state.error.as_deref());
    let Some(result) = &state.result else {
        return;
    };
    push_summary(lines, &OperationResult::CaseStatus(result.clone()));
    let columns = document_outcome_columns();
    for (title, records) in [
        ("Successful Documents", &result.successful_documents),
        ("Failed Documents", &result.failed_documents),
        ("Create OSC Documents", &result.create_osc_documents),
    ] {
        push_section(
            lines,
            ctx.query,
            Section {
                title,
                records,
                empty_text: EMPTY_RESULT_TEXT,
                columns: Some(&columns),
            },
            DocumentOutcome::matches_query,
            outcome_row,
        );
    }
}

fn push_document_text(lines: &mut Vec<Line>, text: &str, editing: bool) {
    if text.is_empty() && !editing {
        lines.push(Line::new(
            "  one per line, e.g. 20260105-F-735042",
            TextRole::Muted,
        ));
        return;
    }
    let rows: Vec<&str> = text.split('\n').collect();
    let last = rows.len() - 1;
    for (idx, row) in rows.iter().enumerate() {
        let cursor = if editing && idx == last { "_" } else { "" };
        lines.push(Line::new(format!("  {row}{cursor}"), TextRole::Primary));
    }
}

fn submit_line(phase: BulkPhase, action: BulkAction, count: usize, spinner: char) -> Line {
    match phase {
        BulkPhase::Submitting(_) => Line::new(format!("{spinner} Processing..."), TextRole::Muted),
        _ if count == 0 => Line::new(
            "Submit (enter at least one document number)",
            TextRole::Muted,
        ),
        phase if phase.can_submit() => Line::new(
            format!("[Enter] Submit: {}", action.title()),
            TextRole::Accent,
        ),
        _ => Line::new("Submit", TextRole::Muted),
    }
}
