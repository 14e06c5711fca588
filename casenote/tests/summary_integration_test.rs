//! End-to-end tests for the summary pipeline: notes in the database through
//! the mocked provider to a closed case.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use libsql::Connection;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use casenote::config::SummarizerConfig;
use casenote::db::repository::{CaseRepository, NoteRepository};
use casenote::db::Database;
use casenote::error::CasenoteError;
use casenote::llm::SummaryProvider;
use casenote::models::{Case, CaseStatus, Gender, Note};
use casenote::services::{FixedWindowLimiter, SummaryService};

fn summarizer_config(base_url: String) -> SummarizerConfig {
    SummarizerConfig {
        model: "t5-small".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
        max_attempts: 1,
        retry_delay_ms: 0,
        cold_start_delay_ms: 0,
        max_cold_start_retries: 2,
        max_length: 150,
        min_length: 30,
        temperature: 0.3,
    }
}

fn service(server_url: String, max_requests: u32) -> SummaryService {
    let config = summarizer_config(server_url);
    SummaryService::new(
        SummaryProvider::new(Some(&config)),
        Arc::new(FixedWindowLimiter::new(
            max_requests,
            Duration::from_secs(60),
        )),
        5,
    )
}

async fn setup_case_with_notes(note_contents: &[&str]) -> (Database, Connection, String) {
    let db = Database::in_memory().await.unwrap();
    let conn = db.connect().unwrap();

    let case = Case::new(
        "case-int".to_string(),
        "John Smith".to_string(),
        67,
        Gender::Male,
        "Shortness of breath".to_string(),
    );
    CaseRepository::create(&conn, &case).await.unwrap();

    let base = Utc::now();
    for (i, content) in note_contents.iter().enumerate() {
        let note = Note::new(
            format!("note-{i}"),
            case.id.clone(),
            content.to_string(),
            base + ChronoDuration::days(i as i64),
        );
        NoteRepository::create(&conn, &note).await.unwrap();
    }

    (db, conn, case.id)
}

#[tokio::test]
async fn test_summary_closes_case_with_normalized_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"summary_text": "summarize: Visit 1: Patient admitted.  Recovered fully."}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (_db, conn, case_id) = setup_case_with_notes(&["Admitted.", "Recovered."]).await;
    let svc = service(server.uri(), 3);

    let closed = svc.summarize_and_close(&conn, &case_id).await.unwrap();

    assert_eq!(closed.status, CaseStatus::Closed);
    assert_eq!(
        closed.summary.as_deref(),
        Some("Medical Case Summary\n\nPatient admitted. Recovered fully.")
    );

    // And the persisted row matches what the caller saw.
    let persisted = CaseRepository::get_by_id(&conn, &case_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.status, CaseStatus::Closed);
    assert_eq!(persisted.summary, closed.summary);
}

#[tokio::test]
async fn test_second_close_attempt_conflicts_and_keeps_first_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"summary_text": "First summary."}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_db, conn, case_id) = setup_case_with_notes(&["Only visit."]).await;
    let svc = service(server.uri(), 3);

    let closed = svc.summarize_and_close(&conn, &case_id).await.unwrap();
    let err = svc.summarize_and_close(&conn, &case_id).await.unwrap_err();

    assert!(matches!(err, CasenoteError::InvalidState(_)));
    let persisted = CaseRepository::get_by_id(&conn, &case_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.summary, closed.summary);
}

#[tokio::test]
async fn test_only_most_recent_notes_reach_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"summary_text": "Condensed."}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let contents: Vec<String> = (1..=7).map(|i| format!("Observation {i}.")).collect();
    let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
    let (_db, conn, case_id) = setup_case_with_notes(&refs).await;

    let svc = service(server.uri(), 3);
    svc.summarize_and_close(&conn, &case_id).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    let inputs = body["inputs"].as_str().unwrap();

    // Seven notes on file; only the five most recent go out, renumbered.
    assert!(inputs.starts_with("summarize: "));
    assert!(!inputs.contains("Observation 1."));
    assert!(!inputs.contains("Observation 2."));
    assert!(inputs.contains("Visit 1: Observation 3."));
    assert!(inputs.contains("Visit 5: Observation 7."));
}

#[tokio::test]
async fn test_requests_beyond_the_window_are_rejected() {
    let server = MockServer::start().await;
    let (_db, conn, _case_id) = setup_case_with_notes(&[]).await;

    // Three admissions per window; every attempt consumes one, even against
    // a missing case.
    let svc = service(server.uri(), 3);
    for _ in 0..3 {
        let err = svc.summarize_and_close(&conn, "ghost").await.unwrap_err();
        assert!(matches!(err, CasenoteError::NotFound(_)));
    }

    let err = svc.summarize_and_close(&conn, "ghost").await.unwrap_err();
    assert!(matches!(err, CasenoteError::RateLimited { .. }));
}

#[tokio::test]
async fn test_provider_failure_leaves_case_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (_db, conn, case_id) = setup_case_with_notes(&["Visit."]).await;
    let svc = service(server.uri(), 3);

    let err = svc.summarize_and_close(&conn, &case_id).await.unwrap_err();
    assert!(matches!(err, CasenoteError::Provider { status: 500, .. }));

    let persisted = CaseRepository::get_by_id(&conn, &case_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(persisted.status, CaseStatus::Open);
    assert!(persisted.summary.is_none());
}
