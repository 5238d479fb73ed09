use serde::{Deserialize, Serialize};
use std::time::Duration;
use taxon_common_http::{headers, parse_json, HttpClient, HttpError, RequestBuilder};

#[derive(Serialize)]
struct Ping {
    message: &'static str,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Pong {
    echo: String,
}

#[tokio::test]
async fn test_post_json_sends_headers_and_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/echo")
        .match_header(headers::X_API_KEY, "secret")
        .match_header(headers::ANTHROPIC_VERSION, "2023-06-01")
        .match_body(mockito::Matcher::Json(serde_json::json!({"message": "hi"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"echo":"hi"}"#)
        .create_async()
        .await;

    let request = RequestBuilder::new()
        .base_url(server.url())
        .api_key("secret")
        .header(headers::ANTHROPIC_VERSION, "2023-06-01")
        .json_content();
    let client = HttpClient::new().unwrap();

    let response = client
        .post_json(&request, "/v1/echo", &Ping { message: "hi" })
        .await
        .unwrap();
    let response = HttpClient::check_response(response).await.unwrap();
    let pong: Pong = parse_json(response).await.unwrap();

    assert_eq!(pong, Pong { echo: "hi".into() });
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_response_maps_status_codes() {
    let mut server = mockito::Server::new_async().await;
    let _limited = server
        .mock("POST", "/limited")
        .with_status(429)
        .with_header("retry-after", "7")
        .create_async()
        .await;
    let _broken = server
        .mock("POST", "/broken")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;
    let _denied = server
        .mock("POST", "/denied")
        .with_status(401)
        .with_body("bad key")
        .create_async()
        .await;

    let request = RequestBuilder::new().base_url(server.url());
    let client = HttpClient::new().unwrap();
    let body = serde_json::json!({});

    let response = client.post_json(&request, "/limited", &body).await.unwrap();
    match HttpClient::check_response(response).await {
        Err(HttpError::RateLimited { retry_after }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)))
        }
        other => panic!("unexpected: {other:?}"),
    }

    let response = client.post_json(&request, "/broken", &body).await.unwrap();
    match HttpClient::check_response(response).await {
        Err(HttpError::ServerError { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("unexpected: {other:?}"),
    }

    let response = client.post_json(&request, "/denied", &body).await.unwrap();
    assert!(matches!(
        HttpClient::check_response(response).await,
        Err(HttpError::ClientError { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_parse_json_reports_body_on_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/garbage")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let request = RequestBuilder::new().base_url(server.url());
    let client = HttpClient::new().unwrap();
    let response = client
        .post_json(&request, "/garbage", &serde_json::json!({}))
        .await
        .unwrap();

    let err = parse_json::<Pong>(response).await.unwrap_err();
    match err {
        taxon_common_http::ResponseError::Parse { status, body, .. } => {
            assert_eq!(status, 200);
            assert_eq!(body, "not json");
        }
        other => panic!("unexpected: {other:?}"),
    }
}
