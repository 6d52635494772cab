use astropost::apod::ApodClient;
use astropost::errors::PublishError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn apod_body() -> serde_json::Value {
    serde_json::json!({
        "explanation": "A dark nebula in Orion.",
        "url": "https://apod.nasa.gov/image/horsehead.jpg",
        "hdurl": "https://apod.nasa.gov/image/horsehead_hd.jpg",
        "media_type": "image",
        "title": "Horsehead Nebula",
        "date": "2024-01-01"
    })
}

#[tokio::test]
async fn test_fetch_parses_daily_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("date", "2024-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apod_body()))
        .mount(&server)
        .await;

    let client = ApodClient::with_base_url("test-key".to_string(), server.uri());
    let item = client.fetch("2024-01-01").await.unwrap();

    assert_eq!(item.title, "Horsehead Nebula");
    assert_eq!(item.explanation, "A dark nebula in Orion.");
    assert_eq!(item.url, "https://apod.nasa.gov/image/horsehead.jpg");
    assert_eq!(
        item.hdurl.as_deref(),
        Some("https://apod.nasa.gov/image/horsehead_hd.jpg")
    );
    assert_eq!(item.media_type, "image");
    assert_eq!(item.date, "2024-01-01");
}

#[tokio::test]
async fn test_fetch_accepts_item_without_hd_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "explanation": "A total eclipse, as video.",
            "url": "https://example.com/eclipse",
            "media_type": "video",
            "title": "Eclipse",
            "date": "2024-04-08"
        })))
        .mount(&server)
        .await;

    let client = ApodClient::with_base_url("test-key".to_string(), server.uri());
    let item = client.fetch("2024-04-08").await.unwrap();

    assert_eq!(item.hdurl, None);
    assert_eq!(item.media_type, "video");
}

#[tokio::test]
async fn test_fetch_propagates_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"error": "API_KEY_INVALID"})),
        )
        .mount(&server)
        .await;

    let client = ApodClient::with_base_url("bad-key".to_string(), server.uri());
    let err = client.fetch("2024-01-01").await.unwrap_err();

    match err {
        PublishError::ContentFetch(msg) => {
            assert!(msg.contains("403"), "unexpected message: {msg}");
        }
        other => panic!("Expected ContentFetch, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ApodClient::with_base_url("test-key".to_string(), server.uri());
    let err = client.fetch("2024-01-01").await.unwrap_err();

    assert!(matches!(err, PublishError::ContentFetch(_)));
}
