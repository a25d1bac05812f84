use std::num::NonZeroU32;

use chatdash_core::{CreateAnalysisRequest, Filter, ListSource, PageQuery, PagingStyle};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client_tests::test_client;
use crate::listings::{listing_query, path_segment};
use crate::{ClientError, LogsSource, MessagesSource};

fn ten() -> NonZeroU32 {
    NonZeroU32::new(10).unwrap()
}

#[test]
fn test_listing_query_window_first() {
    let filter = Filter::new().with("date", "2025-07-16");
    let pairs = listing_query(PagingStyle::OffsetLimit, &filter, PageQuery::for_page(2, ten()));
    assert_eq!(
        pairs,
        vec![
            ("offset".to_owned(), "10".to_owned()),
            ("limit".to_owned(), "10".to_owned()),
            ("date".to_owned(), "2025-07-16".to_owned()),
        ]
    );
}

#[test]
fn test_filter_cannot_override_window() {
    let filter = Filter::new().with("offset", "999").with("page", "7").with("chat_id", "1");
    let pairs = listing_query(PagingStyle::OffsetLimit, &filter, PageQuery::for_page(1, ten()));
    assert!(pairs.contains(&("offset".to_owned(), "0".to_owned())));
    assert!(!pairs.contains(&("offset".to_owned(), "999".to_owned())));
    // `page` is not a window key in offset/limit style, so it passes through.
    assert!(pairs.contains(&("page".to_owned(), "7".to_owned())));
}

#[test]
fn test_path_segment_validation() {
    assert_eq!(path_segment("chat", "-1001234").unwrap(), "-1001234");
    assert_eq!(path_segment("analysis", " 6f1c3a1e-8a57 ").unwrap(), "6f1c3a1e-8a57");
    assert!(path_segment("chat", "../admin").is_err());
    assert!(path_segment("chat", "..").is_err());
    assert!(path_segment("chat", "").is_err());
    assert!(path_segment("chat", "1?x=2").is_err());
}

#[tokio::test]
async fn test_list_logs_sends_window_and_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("offset", "20"))
        .and(query_param("limit", "10"))
        .and(query_param("date", "2025-07-16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "logs": [
                {"level": "INFO", "message": "started", "date": "2025-07-16T08:00:00"},
                {"level": "ERROR", "message": "failed", "date": "2025-07-16T08:01:00"}
            ],
            "total": 22
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = Filter::new().with("date", "2025-07-16");
    let listing =
        test_client(&server).list_logs(&filter, PageQuery::for_page(3, ten())).await.unwrap();
    assert_eq!(listing.total, 22);
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[1].level.as_deref(), Some("ERROR"));
}

#[tokio::test]
async fn test_list_analyses_reads_total_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analysis/all"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "analyses": [{"analysis_id": "a-1", "prompt_name": "Digest", "filters": null}],
            "total_count": 31
        })))
        .mount(&server)
        .await;

    let listing = test_client(&server)
        .list_analyses(&Filter::new(), PageQuery::for_page(1, ten()))
        .await
        .unwrap();
    assert_eq!(listing.total, 31);
    assert_eq!(listing.items[0].analysis_id, "a-1");
}

#[tokio::test]
async fn test_messages_source_uses_page_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "10"))
        .and(query_param("chat_id", "-100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{"text": "hi", "user_id": 5, "chat_id": -100}],
            "total": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = MessagesSource::new(test_client(&server));
    let filter = Filter::new().with("chat_id", "-100");
    let listing = source.fetch(&filter, PageQuery::for_page(2, ten())).await.unwrap();
    assert_eq!(listing.total, 11);
    assert_eq!(listing.items[0].user_id.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_logs_source_propagates_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let source = LogsSource::new(test_client(&server));
    let err = source.fetch(&Filter::new(), PageQuery::for_page(1, ten())).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_analysis_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analysis/a-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prompt_name": "Digest",
            "result_text": "All quiet.",
            "tokens_input": 2000,
            "tokens_output": 100,
            "timestamp": "2025-07-16T10:00:00"
        })))
        .mount(&server)
        .await;

    let details = test_client(&server).analysis("a-42").await.unwrap();
    assert_eq!(details.result_text.as_deref(), Some("All quiet."));
    assert!((details.input_cost() - 0.06).abs() < 1e-9);
}

#[tokio::test]
async fn test_create_analysis_refuses_empty_message_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analysis/create"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let request = CreateAnalysisRequest {
        prompt_id: "p1".to_owned(),
        filters: Filter::new(),
        messages: vec![],
    };
    let err = test_client(&server).create_analysis(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_analyze_then_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analyze"))
        .and(query_param("user_id", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": [{"text": "hello", "user_id": 5}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analysis/create"))
        .and(body_partial_json(serde_json::json!({
            "prompt_id": "p1",
            "filters": {"user_id": "5"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "analysis_id": "a-9",
            "result_text": "Summary"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let filter = Filter::new().with("user_id", "5");
    let messages = client.messages_for_analysis(&filter).await.unwrap();
    assert_eq!(messages.len(), 1);

    let created = client
        .create_analysis(&CreateAnalysisRequest {
            prompt_id: "p1".to_owned(),
            filters: filter,
            messages,
        })
        .await
        .unwrap();
    assert!(created.has_result());
    assert_eq!(created.analysis_id.as_deref(), Some("a-9"));
}

#[tokio::test]
async fn test_download_url_requires_url_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download"))
        .and(query_param("s3_key", "chats/1/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = test_client(&server).download_url("chats/1/photo.jpg").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingField(ref f) if f == "url"));
}
