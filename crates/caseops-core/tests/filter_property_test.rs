use std::borrow::Cow;

use caseops_core::filter::{filter_records, fold_case, normalize_query, FilterView};
use caseops_core::model::{CaseDetail, DocumentOutcome};
use proptest::prelude::*;

fn document_numbers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[0-9]{4}-[A-Fa-f]-[0-9]{3}", 0..24)
}

fn detail_strategy() -> impl Strategy<Value = CaseDetail> {
    (
        prop::option::of("[A-Z]-[0-9]{2}"),
        prop::option::of("case-[0-9]{2}"),
        prop::option::of("(CANCELLED|FAILED|COMPLETED)"),
        prop::option::of("[a-z ]{0,12}"),
    )
        .prop_map(|(case_reference, case_id, status, message)| CaseDetail {
            case_reference,
            case_id,
            status,
            message,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn blank_query_is_identity(records in document_numbers(), pad in "[ \t]{0,4}") {
        match filter_records(&records, &pad) {
            Cow::Borrowed(slice) => prop_assert!(std::ptr::eq(slice, records.as_slice())),
            Cow::Owned(_) => prop_assert!(false, "blank query copied records"),
        }
    }

    #[test]
    fn extending_query_never_grows_result(
        records in prop::collection::vec(detail_strategy(), 0..16),
        base in "[a-z0-9-]{0,3}",
        suffix in "[a-z0-9-]{1,3}",
    ) {
        let short = filter_records(&records, &base);
        let long = filter_records(&records, &format!("{base}{suffix}"));
        prop_assert!(long.len() <= short.len());
        for record in long.iter() {
            prop_assert!(short.contains(record));
        }
    }

    #[test]
    fn extending_non_ascii_query_never_grows_result(
        records in prop::collection::vec("[aAbσςΣßİı -]{0,8}", 0..16),
        base in "[aAbσςΣßİı -]{0,3}",
        suffix in "[aAbσςΣßİı-]{1,3}",
    ) {
        let short = filter_records(&records, &base);
        let long = filter_records(&records, &format!("{base}{suffix}"));
        prop_assert!(long.len() <= short.len());
        for record in long.iter() {
            prop_assert!(short.contains(record));
        }
    }

    #[test]
    fn result_is_ordered_subsequence(records in document_numbers(), query in "[0-9a-f-]{1,3}") {
        let out = filter_records(&records, &query);
        let mut cursor = records.iter();
        for hit in out.iter() {
            prop_assert!(cursor.any(|candidate| candidate == hit));
        }
        let needle = normalize_query(&query);
        for hit in out.iter() {
            prop_assert!(fold_case(hit).contains(&needle));
        }
    }

    #[test]
    fn input_is_never_mutated(records in document_numbers(), query in ".{0,4}") {
        let before = records.clone();
        let _ = filter_records(&records, &query);
        prop_assert_eq!(records, before);
    }
}

#[test]
fn scenario_document_search_across_cases() {
    let records = vec![
        DocumentOutcome::bare("20260105-F-735042"),
        DocumentOutcome::bare("20260105-F-735043"),
        DocumentOutcome::bare("20260106-F-100001"),
    ];
    let hits = filter_records(&records, "f-7350");
    assert_eq!(hits.len(), 2);
    assert_eq!(
        FilterView::classify(records.len(), hits.len(), "f-7350")
            .showing_line()
            .as_deref(),
        Some("Showing 2 of 3")
    );

    let none = filter_records(&records, "ZZZ");
    assert_eq!(
        FilterView::classify(records.len(), none.len(), "ZZZ"),
        FilterView::NoMatches {
            query: "ZZZ".to_owned()
        }
    );
}
