//! Kick API client against a local mock server.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatroll::{CommentSource, DownloadConfig, Downloader, Error, HttpClient, KickSource, RetryPolicy, SessionInfo};

fn source(server: &MockServer) -> KickSource {
    KickSource::with_client(HttpClient::new().unwrap()).with_api_base(format!("{}/api", server.uri()))
}

fn messages(items: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": { "messages": items } }))
}

#[tokio::test]
async fn session_info_from_video_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/video/abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "livestream": {
                "channel_id": 4242,
                "session_title": "Late night stream",
                "start_time": "2024-03-01 12:00:00",
                "duration": 3_600_000
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = source(&server)
        .session_info("https://kick.com/somechannel/videos/abc-123")
        .await
        .unwrap();

    assert_eq!(session.channel_id, 4242);
    assert_eq!(session.title, "Late night stream");
    assert_eq!(session.start, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    assert_eq!(session.duration_ms, 3_600_000);
}

#[tokio::test]
async fn session_info_rejects_foreign_url_without_requests() {
    let server = MockServer::start().await;
    let err = source(&server)
        .session_info("https://example.com/x/videos/abc")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_window_decodes_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .and(query_param("start_time", "2024-03-01T12:00:05.000Z"))
        .respond_with(messages(json!([
            {"id": "m1", "user_id": 10, "content": "hello", "created_at": "2024-03-01T12:00:06Z"},
            {"id": "m2", "user_id": 11, "content": "there", "created_at": "2024-03-01T12:00:07Z"}
        ])))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 5).unwrap();
    let chats = source(&server).fetch_window(7, start).await.unwrap().unwrap();

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].id, "m1");
    assert_eq!(chats[0].author_id, "10");
    assert_eq!(chats[1].content, "there");
}

#[tokio::test]
async fn payload_without_messages_is_empty_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let window = source(&server).fetch_window(7, start).await.unwrap();
    assert!(window.is_none());
}

#[tokio::test]
async fn error_status_carries_code_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let err = source(&server).fetch_window(7, start).await.unwrap_err();

    match err {
        Error::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    // Window 0: plain success.
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .and(query_param("start_time", "2024-03-01T12:00:00.000Z"))
        .respond_with(messages(json!([
            {"id": "a", "user_id": 1, "content": "first", "created_at": "2024-03-01T12:00:01Z"}
        ])))
        .mount(&server)
        .await;

    // Window 1: two 500s, then the page.
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .and(query_param("start_time", "2024-03-01T12:00:05.000Z"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .and(query_param("start_time", "2024-03-01T12:00:05.000Z"))
        .respond_with(messages(json!([
            {"id": "b", "user_id": 2, "content": "second", "created_at": "2024-03-01T12:00:06.500Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionInfo {
        channel_id: 7,
        title: "retry".to_string(),
        start: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        duration_ms: 10_000,
    };
    let downloader = Downloader::new(source(&server)).with_config(DownloadConfig {
        concurrency: 2,
        window_ms: 5_000,
        retry: RetryPolicy {
            max_retries: 3,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    });
    let comments = downloader.download(&session).await.unwrap();

    let texts: Vec<_> = comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(comments[0].emitted_at, 100);
    assert_eq!(comments[1].emitted_at, 650);
}

#[tokio::test]
async fn persistent_server_errors_abort_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/7/messages"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let session = SessionInfo {
        channel_id: 7,
        title: "down".to_string(),
        start: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        duration_ms: 5_000,
    };
    let downloader = Downloader::new(source(&server)).with_config(DownloadConfig {
        concurrency: 1,
        window_ms: 5_000,
        retry: RetryPolicy {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
    });
    let err = downloader.download(&session).await.unwrap_err();

    match err {
        Error::RetriesExhausted { attempts, last_error, .. } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("502"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
