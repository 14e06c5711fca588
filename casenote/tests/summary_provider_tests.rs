use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use casenote::config::SummarizerConfig;
use casenote::error::CasenoteError;
use casenote::llm::{SummaryApiClient, SummaryBackend, SummaryInput, SummaryProvider};

fn summarizer_config(model: &str, base_url: Option<String>, max_attempts: u32) -> SummarizerConfig {
    SummarizerConfig {
        model: model.to_string(),
        api_key: Some("test-key".to_string()),
        base_url,
        timeout_secs: 5,
        max_attempts,
        retry_delay_ms: 0,
        cold_start_delay_ms: 0,
        max_cold_start_retries: 5,
        max_length: 150,
        min_length: 30,
        temperature: 0.3,
    }
}

fn extractive_body(text: &str) -> serde_json::Value {
    json!([{ "summary_text": text }])
}

fn input(text: &str) -> SummaryInput {
    SummaryInput {
        extractive: format!("summarize: Visit 1: {text}"),
        chat: format!("Visit 1: {text}"),
    }
}

#[test]
fn test_huggingface_backend_detection() {
    let config = summarizer_config("facebook/bart-large-cnn", None, 3);
    let provider = SummaryProvider::new(Some(&config));

    assert!(matches!(provider.backend(), SummaryBackend::HuggingFace));
    assert!(provider.is_available());
}

#[test]
fn test_mistral_backend_detection() {
    let config = summarizer_config("mistral/mistral-tiny", None, 3);
    let provider = SummaryProvider::new(Some(&config));

    assert!(matches!(provider.backend(), SummaryBackend::Mistral));
}

#[test]
fn test_unconfigured_backend_is_unavailable() {
    let provider = SummaryProvider::new(None);

    assert!(matches!(
        provider.backend(),
        SummaryBackend::Unavailable { .. }
    ));
    assert!(!provider.is_available());
}

#[tokio::test]
async fn test_generate_returns_parsed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(extractive_body("Patient recovered.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 1);
    let client = SummaryApiClient::new(&config).expect("client");

    let response = client.generate(&input("stable")).await.expect("generate");
    assert_eq!(response.text(), Some("Patient recovered."));
}

#[tokio::test]
async fn test_transient_server_error_is_retried() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_mock = Arc::clone(&attempts);

    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(move |_request: &Request| {
            if attempts_for_mock.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(500).set_body_string("upstream temporary failure")
            } else {
                ResponseTemplate::new(200).set_body_json(extractive_body("Recovered."))
            }
        })
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 3);
    let client = SummaryApiClient::new(&config).expect("client");

    let response = client.generate(&input("retry")).await.expect("generate");
    assert_eq!(response.text(), Some("Recovered."));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_exhausted_attempts_surface_the_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(500).set_body_string("still broken"))
        .expect(3)
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 3);
    let client = SummaryApiClient::new(&config).expect("client");

    let err = client.generate(&input("down")).await.unwrap_err();
    assert!(matches!(err, CasenoteError::Provider { status: 500, .. }));
}

#[tokio::test]
async fn test_cold_start_waits_do_not_consume_attempts() {
    let server = MockServer::start().await;
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_for_mock = Arc::clone(&attempts);

    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(move |_request: &Request| {
            if attempts_for_mock.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(503)
                    .set_body_json(json!({"error": "Model is currently loading"}))
            } else {
                ResponseTemplate::new(200).set_body_json(extractive_body("Warmed up."))
            }
        })
        .mount(&server)
        .await;

    // max_attempts = 1: any cold start counted as a failure would abort here.
    let config = summarizer_config("t5-small", Some(server.uri()), 1);
    let client = SummaryApiClient::new(&config).expect("client");

    let response = client.generate(&input("warmup")).await.expect("generate");
    assert_eq!(response.text(), Some("Warmed up."));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_cold_start_waits_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": "Model is currently loading"})),
        )
        .mount(&server)
        .await;

    let mut config = summarizer_config("t5-small", Some(server.uri()), 3);
    config.max_cold_start_retries = 2;
    let client = SummaryApiClient::new(&config).expect("client");

    let err = client.generate(&input("never warm")).await.unwrap_err();
    assert!(matches!(err, CasenoteError::Provider { status: 503, .. }));
    // Initial attempt plus two bounded retries.
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 3);
    let client = SummaryApiClient::new(&config).expect("client");

    let err = client.generate(&input("auth")).await.unwrap_err();
    assert!(matches!(err, CasenoteError::Provider { status: 401, .. }));
}

#[tokio::test]
async fn test_upstream_rate_limit_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": "slow down"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 3);
    let client = SummaryApiClient::new(&config).expect("client");

    let err = client.generate(&input("limited")).await.unwrap_err();
    assert!(matches!(err, CasenoteError::RateLimited { .. }));
}

#[tokio::test]
async fn test_unrecognized_success_body_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/t5-small"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": 1})))
        .expect(2)
        .mount(&server)
        .await;

    let config = summarizer_config("t5-small", Some(server.uri()), 2);
    let client = SummaryApiClient::new(&config).expect("client");

    let err = client.generate(&input("garbage")).await.unwrap_err();
    assert!(matches!(err, CasenoteError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_chat_backend_posts_to_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Chat summary."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = summarizer_config("mistral/mistral-tiny", Some(server.uri()), 1);
    let client = SummaryApiClient::new(&config).expect("client");

    let response = client.generate(&input("chat")).await.expect("generate");
    assert_eq!(response.text(), Some("Chat summary."));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["model"], "mistral-tiny");
    assert_eq!(body["messages"][0]["role"], "system");
}
