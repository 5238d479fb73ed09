//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use taxon_common_config::{vars, ServiceConfig};
use taxon_common_http::{headers, parse_json, HttpClient, HttpConfig, RequestBuilder};

use crate::error::GeneratorError;
use crate::generator::{GenerationRequest, TextGenerator};

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl ClaudeConfig {
    pub fn from_service(service: &ServiceConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: service.base_url.clone(),
            model: service.model.clone(),
            timeout: Duration::from_secs(service.timeout_secs),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Single-shot, non-streaming Messages API client.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http: HttpClient,
    request: RequestBuilder,
    model: String,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Result<Self, GeneratorError> {
        if config.api_key.trim().is_empty() {
            return Err(GeneratorError::MissingApiKey(vars::ANTHROPIC_API_KEY));
        }

        let http = HttpClient::with_config(HttpConfig::default().with_timeout(config.timeout))?;
        let request = RequestBuilder::new()
            .base_url(config.base_url)
            .api_key(config.api_key)
            .header(headers::ANTHROPIC_VERSION, API_VERSION)
            .json_content();

        Ok(Self {
            http,
            request,
            model: config.model,
        })
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system,
            messages: [UserMessage {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self.http.post_json(&self.request, MESSAGES_PATH, &body).await?;
        let response = HttpClient::check_response(response).await?;
        let reply: MessagesResponse = parse_json(response).await?;

        debug!(blocks = reply.content.len(), "Messages API replied");
        reply
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .ok_or(GeneratorError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            system: "be brief".into(),
            prompt: "describe p5.js".into(),
            max_tokens: 2000,
            temperature: 0.3,
        }
    }

    fn client(base_url: String) -> ClaudeClient {
        ClaudeClient::new(ClaudeConfig {
            api_key: "test-key".into(),
            base_url,
            model: "claude-3-haiku-20240307".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let config = ClaudeConfig::from_service(&ServiceConfig::default(), " ");
        assert!(matches!(
            ClaudeClient::new(config),
            Err(GeneratorError::MissingApiKey(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_returns_first_text_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-haiku-20240307",
                "max_tokens": 2000,
                "system": "be brief",
                "messages": [{"role": "user", "content": "describe p5.js"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "msg_1",
                    "content": [
                        {"type": "tool_use", "id": "t", "name": "x", "input": {}},
                        {"type": "text", "text": "first"},
                        {"type": "text", "text": "second"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client(server.url()).generate(&request()).await.unwrap();
        assert_eq!(text, "first");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reply_without_text_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let err = client(server.url()).generate(&request()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::EmptyReply));
    }

    #[tokio::test]
    async fn test_service_error_is_propagated() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(r#"{"error": {"message": "invalid x-api-key"}}"#)
            .create_async()
            .await;

        let err = client(server.url()).generate(&request()).await.unwrap_err();
        match err {
            GeneratorError::Http(e) => assert_eq!(e.status(), Some(401)),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
