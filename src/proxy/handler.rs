//! Completion forwarding handler.
//!
//! Every request, whatever its method or path:
//! 1. Reads the body as JSON, treating anything unparsable as `{}`
//! 2. Takes `messages` from it, or a single `ping` user message
//! 3. Posts `{model, messages}` upstream with the bearer credential
//! 4. Relays the upstream status and body, always labelled as JSON

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde::Serialize;
use serde_json::{Value, json};

use super::ProxyState;
use super::error::ProxyError;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Value,
}

fn default_messages() -> Value {
    json!([{ "role": "user", "content": "ping" }])
}

/// Messages to forward for an inbound body.
pub fn messages_from_body(body: &[u8]) -> Value {
    let parsed = serde_json::from_slice::<Value>(body).unwrap_or_else(|err| {
        if !body.is_empty() {
            tracing::debug!(error = %err, "inbound body is not JSON, treating as empty");
        }
        Value::Object(Default::default())
    });

    match parsed.get("messages") {
        Some(messages) if !messages.is_null() => messages.clone(),
        _ => default_messages(),
    }
}

pub async fn forward_completion(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let messages = messages_from_body(&body);
    let config = &state.config;

    let upstream = state
        .client
        .post(&config.upstream_url)
        .bearer_auth(&config.api_key)
        .json(&CompletionRequest {
            model: &config.model,
            messages,
        })
        .send()
        .await?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let payload = upstream.bytes().await?;
    tracing::debug!(status = status.as_u16(), bytes = payload.len(), "relaying upstream response");

    let response = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload))?;
    Ok(response)
}
