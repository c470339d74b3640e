//! Integration tests for the completion proxy
//!
//! A wiremock server stands in for the provider; the router is driven in-process.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use banter::proxy::{self, ProxyConfig, ProxyState};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

fn config_for(upstream_url: String) -> ProxyConfig {
    ProxyConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        upstream_url,
        model: "gpt-4o-mini".into(),
        api_key: "sk-test".into(),
    }
}

async fn send(config: ProxyConfig, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let app = proxy::router(ProxyState::new(config));
    let resp = app.oneshot(request).await.expect("request");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    (status, content_type, body)
}

fn post(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn upstream_expecting(messages: serde_json::Value, reply: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header_eq("authorization", "Bearer sk-test"))
        .and(header_eq("content-type", "application/json"))
        .and(body_json(json!({ "model": "gpt-4o-mini", "messages": messages })))
        .respond_with(reply)
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn upstream_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), COMPLETIONS_PATH)
}

mod forwarding_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_object_forwards_default_ping() {
        let server = upstream_expecting(
            json!([{ "role": "user", "content": "ping" }]),
            ResponseTemplate::new(200).set_body_string(r#"{"id":"chatcmpl-1"}"#),
        )
        .await;

        let (status, content_type, body) = send(config_for(upstream_url(&server)), post("{}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, br#"{"id":"chatcmpl-1"}"#);
    }

    #[tokio::test]
    async fn test_malformed_body_behaves_like_empty_object() {
        let server = upstream_expecting(
            json!([{ "role": "user", "content": "ping" }]),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let (status, _, _) = send(config_for(upstream_url(&server)), post("this is not json")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_messages_forwarded_verbatim() {
        let messages = json!([
            { "role": "system", "content": "answer briefly" },
            { "role": "user", "content": "hello" }
        ]);
        let server = upstream_expecting(
            messages,
            ResponseTemplate::new(200).set_body_string(r#"{"choices":[]}"#),
        )
        .await;

        let body = r#"{"messages":[{"role":"system","content":"answer briefly"},{"role":"user","content":"hello"}]}"#;
        let (status, _, relayed) = send(config_for(upstream_url(&server)), post(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(relayed, br#"{"choices":[]}"#);
    }

    #[tokio::test]
    async fn test_any_method_and_path_accepted() {
        let server = upstream_expecting(
            json!([{ "role": "user", "content": "ping" }]),
            ResponseTemplate::new(200).set_body_string("{}"),
        )
        .await;

        let request = Request::builder()
            .method("GET")
            .uri("/some/other/path")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(config_for(upstream_url(&server)), request).await;
        assert_eq!(status, StatusCode::OK);
    }
}

mod relay_tests {
    use super::*;

    #[tokio::test]
    async fn test_upstream_error_status_relayed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_string(r#"{"error":{"message":"rate limited"}}"#),
            )
            .mount(&server)
            .await;

        let (status, content_type, body) = send(config_for(upstream_url(&server)), post("{}")).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, br#"{"error":{"message":"rate limited"}}"#);
    }

    #[tokio::test]
    async fn test_content_type_forced_to_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("plain text from upstream"),
            )
            .mount(&server)
            .await;

        let (status, content_type, body) = send(config_for(upstream_url(&server)), post("{}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, b"plain text from upstream");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let config = config_for("http://127.0.0.1:1/v1/chat/completions".into());
        let (status, content_type, body) = send(config, post("{}")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let json: serde_json::Value = serde_json::from_slice(&body).expect("parse JSON");
        assert_eq!(json["error"], "upstream_unavailable");
    }

    #[tokio::test]
    async fn test_cors_headers_added() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::ORIGIN, "http://localhost:8080")
            .body(Body::from("{}"))
            .unwrap();
        let app = proxy::router(ProxyState::new(config_for(upstream_url(&server))));
        let resp = app.oneshot(request).await.expect("request");

        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_preflight_answered_without_forwarding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&server)
            .await;

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/")
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let app = proxy::router(ProxyState::new(config_for(upstream_url(&server))));
        let resp = app.oneshot(request).await.expect("request");

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_large_body_forwarded() {
        let content = "x".repeat(3 * 1024 * 1024);
        let messages = json!([{ "role": "user", "content": content }]);
        let server = upstream_expecting(
            messages.clone(),
            ResponseTemplate::new(200).set_body_string(r#"{"choices":[]}"#),
        )
        .await;

        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "messages": messages }).to_string()))
            .unwrap();
        let (status, _, relayed) = send(config_for(upstream_url(&server)), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(relayed, br#"{"choices":[]}"#);
        let received = server.received_requests().await.unwrap_or_default();
        assert_eq!(received.len(), 1);
        assert!(received[0].body.len() > content.len());
    }
}
