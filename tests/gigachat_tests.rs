use astropost::errors::PublishError;
use astropost::gigachat::GigaChatClient;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GigaChatClient {
    GigaChatClient::with_base_urls(
        Some("test-secret".to_string()),
        server.uri(),
        server.uri(),
    )
    .unwrap()
}

fn token_body() -> serde_json::Value {
    serde_json::json!({
        "access_token": "tok-123",
        "expires_at": 1735689600000i64
    })
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_token_request_shape_and_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .and(header("Authorization", "Basic test-secret"))
        .and(header_exists("RqUID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    let credential = client_for(&server).fetch_token().await.unwrap();

    assert_eq!(credential.token, "tok-123");
    assert_eq!(credential.expires_at, 1735689600000);
}

#[tokio::test]
async fn test_token_missing_fields_is_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "tok"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_token().await.unwrap_err();

    match err {
        PublishError::Credential(msg) => {
            assert!(msg.contains("missing"), "unexpected message: {msg}");
        }
        other => panic!("Expected Credential, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_http_failure_is_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/oauth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_token().await.unwrap_err();
    assert!(matches!(err, PublishError::Credential(_)));
}

#[tokio::test]
async fn test_missing_secret_fails_without_network() {
    // No mock is mounted, the call must fail before any request is made
    let server = MockServer::start().await;
    let client = GigaChatClient::with_base_urls(None, server.uri(), server.uri()).unwrap();

    let err = client.fetch_token().await.unwrap_err();

    match err {
        PublishError::Credential(msg) => {
            assert!(msg.contains("GIGACHAT_TOKEN"), "unexpected message: {msg}");
        }
        other => panic!("Expected Credential, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_completion_returns_first_choice() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Туманность в Орионе."}},
                {"message": {"role": "assistant", "content": "second choice"}}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = client.fetch_token().await.unwrap();
    let content = client
        .complete(&credential, "Переведи на русский - A dark nebula in Orion.")
        .await
        .unwrap();

    assert_eq!(content, "Туманность в Орионе.");
}

#[tokio::test]
async fn test_completion_without_choices_is_enrichment_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = client.fetch_token().await.unwrap();
    let err = client.complete(&credential, "text").await.unwrap_err();

    match err {
        PublishError::Enrichment(msg) => {
            assert!(msg.contains("no choices"), "unexpected message: {msg}");
        }
        other => panic!("Expected Enrichment, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_completion_http_failure_is_enrichment_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = client.fetch_token().await.unwrap();
    let err = client.complete(&credential, "text").await.unwrap_err();

    assert!(matches!(err, PublishError::Enrichment(_)));
}

#[tokio::test]
async fn test_count_tokens_parses_first_usage_entry() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tokens/count"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"object": "tokens", "tokens": 7, "characters": 32}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = client.fetch_token().await.unwrap();
    let usage = client.count_tokens(&credential, "My some text").await.unwrap();

    assert_eq!(usage.tokens, 7);
    assert_eq!(usage.characters, 32);
}

#[tokio::test]
async fn test_count_tokens_empty_list_is_enrichment_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tokens/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = client.fetch_token().await.unwrap();
    let err = client.count_tokens(&credential, "text").await.unwrap_err();

    assert!(matches!(err, PublishError::Enrichment(_)));
}
