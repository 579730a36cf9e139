//! HTTP client integration tests against a mock server.
//!
//! Covers the compatibility surface of all four endpoints: request
//! shape (form-encoded bodies), success payloads, application errors
//! on 2xx, non-2xx transport failures, and malformed JSON bodies.

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use finlex::api::{ApiClient, ApiError};

// ── /chat ───────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_success_returns_response_and_references() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_string_contains("message=What+is+Basel+III%3F"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Basel III is a global regulatory framework.",
            "references": [{
                "id": "d1",
                "title": "Basel III Accord",
                "source": "BIS",
                "document_type": "standard",
                "content_preview": "...",
                "relevance": 82
            }]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let reply = client.chat("What is Basel III?").await.unwrap();

    assert_eq!(reply.response, "Basel III is a global regulatory framework.");
    assert_eq!(reply.references.len(), 1);
    assert_eq!(reply.references[0].id, "d1");
    assert_eq!(reply.references[0].relevance_pct(), 82);
}

#[tokio::test]
async fn chat_application_error_on_2xx_is_app_variant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "No API key configured"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let err = client.chat("hello").await.unwrap_err();

    assert_eq!(err, ApiError::App("No API key configured".to_string()));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn chat_non_2xx_is_transport_failure_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            // Even an error-shaped body must not be read on non-2xx.
            ResponseTemplate::new(500).set_body_json(json!({"error": "ignored"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let err = client.chat("hello").await.unwrap_err();

    assert_eq!(err, ApiError::Status(500));
    assert!(err.is_transport());
}

#[tokio::test]
async fn chat_malformed_json_is_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let err = client.chat("hello").await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn chat_null_references_decodes_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "answer",
            "references": null
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let reply = client.chat("hello").await.unwrap();
    assert!(reply.references.is_empty());
}

// ── /clear_chat ─────────────────────────────────────────────────────

#[tokio::test]
async fn clear_chat_reports_server_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clear_chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let reply = client.clear_chat().await.unwrap();
    assert_eq!(reply.status, "success");
}

#[tokio::test]
async fn clear_chat_failure_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clear_chat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    assert_eq!(client.clear_chat().await.unwrap_err(), ApiError::Status(503));
}

// ── /search ─────────────────────────────────────────────────────────

#[tokio::test]
async fn search_sends_form_query_and_returns_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("query=fraud"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "s1",
                "title": "Rule 10b-5",
                "source": "SEC",
                "document_type": "regulation",
                "content_preview": "Employment of manipulative and deceptive devices"
            }]
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let results = client.search("fraud").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "s1");
}

#[tokio::test]
async fn search_zero_results_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let results = client.search("nothing matches this").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_application_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "index unavailable"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    assert_eq!(
        client.search("fraud").await.unwrap_err(),
        ApiError::App("index unavailable".to_string())
    );
}

// ── /document/:id ───────────────────────────────────────────────────

#[tokio::test]
async fn document_fetches_by_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document/d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d1",
            "title": "Basel III Accord",
            "document_type": "standard",
            "source": "BIS",
            "content": "Minimum capital requirements...",
            "publication_date": "2010-12-16",
            "jurisdiction": "International"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let doc = client.document("d1").await.unwrap();

    assert_eq!(doc.id, "d1");
    assert_eq!(doc.publication_date.as_deref(), Some("2010-12-16"));
    assert_eq!(doc.jurisdiction.as_deref(), Some("International"));
}

#[tokio::test]
async fn document_not_found_app_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document/missing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Document not found"})),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    assert_eq!(
        client.document("missing").await.unwrap_err(),
        ApiError::App("Document not found".to_string())
    );
}

#[tokio::test]
async fn document_optional_fields_may_be_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document/d2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "d2",
            "title": "Untitled Memo",
            "document_type": "memo",
            "source": "internal",
            "content": "..."
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri());
    let doc = client.document("d2").await.unwrap();

    assert!(doc.publication_date.is_none());
    assert!(doc.jurisdiction.is_none());
}

#[tokio::test]
async fn connection_refused_is_connect_error() {
    // Unroutable port: nothing is listening.
    let client = ApiClient::new("http://127.0.0.1:1");
    let err = client.chat("hello").await.unwrap_err();
    assert!(matches!(err, ApiError::Connect(_) | ApiError::Other(_)));
}
