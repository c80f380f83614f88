#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Request shapes and error mapping of the HTTP backend against a local fake
//! server.

mod support;

use std::sync::Arc;

use caseops_client::backend::OperationsBackend;
use caseops_client::controller::OperationController;
use caseops_client::error::BackendError;
use caseops_client::http::HttpBackend;
use caseops_core::bulk::BulkAction;
use caseops_core::model::OperationResult;
use caseops_core::panel::PanelKind;
use caseops_core::state::{BulkDraft, FileDraft, PanelPatch, Phase, SelectedFile, StateStore};

use support::{CannedResponse, FakeServer};

fn backend(server: &FakeServer) -> HttpBackend {
    HttpBackend::new(&server.base_url, None).unwrap()
}

#[tokio::test]
async fn data_entry_trigger_posts_without_body_and_decodes() {
    let server = FakeServer::start(vec![(
        "/api/cases/process-dataentry-waiting",
        CannedResponse::json(
            200,
            r#"{"totalCases":2,"successfulCases":1,"failedCases":1,"manualReviewRequired":0,
                "details":[{"caseReference":"R-1","status":"CANCELLED"}],
                "documentNumbersToCancel":["D-1"]}"#,
        ),
    )])
    .await;

    let result = backend(&server).process(PanelKind::DataEntry).await.unwrap();
    match result {
        OperationResult::DataEntry(r) => {
            assert_eq!(r.total_cases, 2);
            assert_eq!(r.details[0].case_reference.as_deref(), Some("R-1"));
            assert_eq!(r.buckets.document_numbers_to_cancel, vec!["D-1"]);
        }
        other => panic!("unexpected variant: {other:?}"),
    }

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/cases/process-dataentry-waiting");
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn bulk_update_sends_document_numbers_json() {
    let server = FakeServer::start(vec![(
        "/api/case/status/move/returning",
        CannedResponse::json(
            200,
            r#"{"totalSubmitted":2,"successCount":1,"failedCount":1,
                "successfulDocuments":["D-1"],
                "failedDocuments":[{"documentNumber":"D-2","reason":"not found"}]}"#,
        ),
    )])
    .await;

    let docs = vec!["D-1".to_string(), "D-2".to_string()];
    let result = backend(&server)
        .bulk_update(BulkAction::MoveToReturning, &docs)
        .await
        .unwrap();
    assert_eq!(result.failed_documents[0].reason.as_deref(), Some("not found"));

    let requests = server.requests();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"documentNumbers": ["D-1", "D-2"]}));
    assert!(requests[0]
        .headers
        .get("content-type")
        .is_some_and(|v| v.starts_with("application/json")));
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let server = FakeServer::start(vec![(
        "/api/case/status/close/followup",
        CannedResponse::json(400, r#"{"message":"No document numbers provided"}"#),
    )])
    .await;

    let err = backend(&server)
        .bulk_update(BulkAction::CloseFollowUp, &["D-1".to_string()])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        BackendError::Status {
            status: 400,
            server_message: Some("No document numbers provided".into()),
        }
    );
}

#[tokio::test]
async fn error_status_without_message_reports_status_code() {
    let server = FakeServer::start(vec![(
        "/api/mrt/process",
        CannedResponse::text(500, "boom"),
    )])
    .await;

    let err = backend(&server).process(PanelKind::Mrt).await.unwrap_err();
    assert_eq!(err.server_message(), None);
    assert_eq!(
        err.user_message("Failed to process MRT cases"),
        "request failed with status code 500"
    );
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{addr}"), None).unwrap();
    let err = backend.process(PanelKind::Email).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport { .. }), "{err:?}");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn daily_report_upload_is_multipart_file_field() {
    let server = FakeServer::start(vec![(
        "/api/daily-report/upload",
        CannedResponse::json(200, r#"{"totalRowsInCsv":3,"businessKeysExtracted":["K-1"]}"#),
    )])
    .await;

    let result = backend(&server)
        .upload_daily_report("daily.csv", b"doc,case\nD-1,C-1\n".to_vec())
        .await
        .unwrap();
    assert_eq!(result.total_rows_in_csv, 3);
    assert_eq!(result.business_keys_extracted, vec!["K-1"]);

    let request = &server.requests()[0];
    assert!(request
        .headers
        .get("content-type")
        .is_some_and(|v| v.starts_with("multipart/form-data")));
    let body = request.body_text();
    assert!(body.contains(r#"name="file""#), "{body}");
    assert!(body.contains(r#"filename="daily.csv""#), "{body}");
    assert!(body.contains("D-1,C-1"), "{body}");
}

#[tokio::test]
async fn letter_excel_download_is_saved_under_disposition_name() {
    let server = FakeServer::start(vec![(
        "/api/letter/process/excel",
        CannedResponse {
            status: 200,
            headers: Vec::new(),
            body: vec![0x50, 0x4b, 0x03, 0x04],
        }
        .with_header(
            "Content-Disposition",
            r#"attachment; filename="letters_20260105.xlsx""#,
        ),
    )])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let ctl = OperationController::new(Arc::new(backend(&server)), dir.path());
    let mut store = StateStore::new();

    ctl.run_download(&mut store).await.unwrap();

    let state = store.letter_download.state();
    assert!(!state.loading);
    let saved = state.result.as_ref().unwrap();
    assert_eq!(saved.path, dir.path().join("letters_20260105.xlsx"));
    assert_eq!(saved.bytes, 4);
    assert_eq!(std::fs::read(&saved.path).unwrap(), vec![0x50, 0x4b, 0x03, 0x04]);
    assert_eq!(store.phase(PanelKind::Letter), Phase::Idle);
}

#[tokio::test]
async fn health_returns_text() {
    let server = FakeServer::start(vec![(
        "/api/cases/health",
        CannedResponse::text(200, "Case processing service is running"),
    )])
    .await;
    let ctl = OperationController::new(Arc::new(backend(&server)), std::env::temp_dir());
    assert_eq!(
        ctl.health().await.unwrap(),
        "Case processing service is running"
    );
}

#[tokio::test]
async fn controller_surfaces_server_message_end_to_end() {
    let server = FakeServer::start(vec![(
        "/api/case/status/move/returning",
        CannedResponse::json(400, r#"{"message":"No document numbers provided"}"#),
    )])
    .await;
    let ctl = OperationController::new(Arc::new(backend(&server)), std::env::temp_dir());
    let mut store = StateStore::new();
    store.move_case_status.merge(PanelPatch::new().draft(BulkDraft {
        action: Some(BulkAction::MoveToReturning),
        document_text: "D-1\n\n D-2 ".into(),
    }));

    ctl.run_operation(&mut store, PanelKind::MoveCaseStatus)
        .await
        .unwrap();

    assert_eq!(
        store.error(PanelKind::MoveCaseStatus),
        Some("No document numbers provided")
    );
    assert!(!store.is_loading(PanelKind::MoveCaseStatus));
    let body: serde_json::Value = serde_json::from_slice(&server.requests()[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"documentNumbers": ["D-1", "D-2"]}));
}

#[tokio::test]
async fn controller_uploads_selected_csv_and_clears_selection() {
    let server = FakeServer::start(vec![(
        "/api/daily-report/upload",
        CannedResponse::json(200, r#"{"processedCases":1}"#),
    )])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("daily.csv");
    std::fs::write(&csv, "a,b\n1,2\n").unwrap();

    let ctl = OperationController::new(Arc::new(backend(&server)), dir.path());
    let mut store = StateStore::new();
    store.daily_report.merge(PanelPatch::new().draft(FileDraft {
        selected: Some(SelectedFile {
            path: csv,
            name: "daily.csv".into(),
            size_bytes: 8,
        }),
    }));

    ctl.run_operation(&mut store, PanelKind::DailyReport)
        .await
        .unwrap();

    let state = store.daily_report.state();
    assert_eq!(state.result.as_ref().map(|r| r.processed_cases), Some(1));
    assert!(state.draft.selected.is_none());
    assert!(server.requests()[0].body_text().contains("1,2"));
}
