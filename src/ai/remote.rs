use super::{ChatError, ChatResult, Responder};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Sends each utterance to a completion proxy as a one-message conversation.
pub struct ProxyResponder {
    client: Client,
    endpoint: String,
}

impl ProxyResponder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    messages: [OutgoingMessage<'a>; 1],
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Deserialize)]
struct CompletionOpenAIShape {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionContentOnly {
    content: String,
}

pub(crate) fn extract_reply(body: String) -> String {
    if let Ok(parsed) = serde_json::from_str::<CompletionOpenAIShape>(&body)
        && let Some(choice) = parsed.choices.into_iter().next()
        && let Some(msg) = choice.message
    {
        return msg.content;
    }

    if let Ok(parsed) = serde_json::from_str::<CompletionContentOnly>(&body) {
        return parsed.content;
    }

    body
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Responder for ProxyResponder {
    async fn reply(&self, text: &str) -> ChatResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ProxyRequest {
                messages: [OutgoingMessage {
                    role: "user",
                    content: text,
                }],
            })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(extract_reply(body))
    }
}
