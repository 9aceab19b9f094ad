//! Streaming chat-completions provider over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use replykit_core::{ApiConfig, ChatMessage, ChatProvider, Error, Result, UpdateFn};

use crate::stream::consume_stream;

/// Header carrying the application id.
const APP_ID_HEADER: &str = "X-App-Id";

/// Provider that talks to a streaming chat-completions endpoint over HTTP.
pub struct HttpChatProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Endpoint URL.
    endpoint: String,
    /// Application id sent with every request.
    app_id: String,
    /// Optional bearer token.
    api_key: Option<String>,
    /// Optional model name.
    model: Option<String>,
}

impl HttpChatProvider {
    /// Creates a provider for the given endpoint and application id.
    pub fn new(endpoint: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            endpoint: endpoint.into(),
            app_id: app_id.into(),
            api_key: None,
            model: None,
        }
    }

    /// Creates a provider from the `[api]` configuration section.
    ///
    /// Empty key and model values are treated as unset.
    pub fn from_config(config: &ApiConfig) -> Self {
        let mut provider = Self::new(config.endpoint.clone(), config.app_id.clone());
        provider.api_key = config.api_key.clone().filter(|key| !key.is_empty());
        provider.model = config.model.clone().filter(|model| !model.is_empty());
        provider
    }

    /// Builds the JSON request body.
    fn build_request<'msg>(&'msg self, messages: &'msg [ChatMessage]) -> ChatRequest<'msg> {
        ChatRequest {
            model: self.model.as_deref(),
            messages,
            stream: true,
        }
    }
}

/// Request payload sent to the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'msg> {
    /// Model identifier, omitted when the endpoint picks one.
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'msg str>,
    /// Conversation sent to the model.
    messages: &'msg [ChatMessage],
    /// Always `true`; the body is consumed as a stream.
    stream: bool,
}

#[async_trait]
impl ChatProvider for HttpChatProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn stream_chat(
        &self,
        messages: &[ChatMessage],
        on_update: &mut UpdateFn<'_>,
    ) -> Result<String> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("chat endpoint is empty".to_owned()));
        }
        let start = Instant::now();

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(APP_ID_HEADER, &self.app_id)
            .header("Accept", "text/event-stream")
            .json(&self.build_request(messages));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Error::Provider(format!("Request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "Chat API request failed with status {status}: {error_text}"
            )));
        }

        let content = consume_stream(Box::pin(response.bytes_stream()), on_update).await?;
        debug!(
            "Stream finished in {}ms with {} chars",
            start.elapsed().as_millis(),
            content.chars().count()
        );

        if content.is_empty() {
            return Err(Error::InvalidResponse(
                "stream ended without content".to_owned(),
            ));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Provider pointed at `/chat` on the mock server
    fn provider_for(server: &MockServer, api_key: Option<&str>) -> HttpChatProvider {
        HttpChatProvider::from_config(&ApiConfig {
            endpoint: format!("{}/chat", server.uri()),
            app_id: "app-1".to_owned(),
            api_key: api_key.map(str::to_owned),
            ..ApiConfig::default()
        })
    }

    fn sse_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
    }

    fn messages() -> [ChatMessage; 2] {
        [ChatMessage::system("sys"), ChatMessage::user("你好")]
    }

    #[tokio::test]
    async fn test_empty_endpoint_is_a_config_error() {
        let provider = HttpChatProvider::new("  ", "app");
        let mut ignore = |_: &str| {};

        let result = provider.stream_chat(&messages(), &mut ignore).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_from_config_drops_empty_key() {
        let config = ApiConfig {
            api_key: Some(String::new()),
            model: Some("gpt-mini".to_owned()),
            ..ApiConfig::default()
        };
        let provider = HttpChatProvider::from_config(&config);
        assert!(provider.api_key.is_none());
        assert_eq!(provider.model.as_deref(), Some("gpt-mini"));
        assert_eq!(provider.name(), "http");
    }

    #[test]
    fn test_request_body() {
        let provider = HttpChatProvider::new("http://localhost/chat", "app");
        let messages = messages();

        let body = to_value(provider.build_request(&messages)).unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "你好"}
                ],
                "stream": true
            })
        );

        let provider = HttpChatProvider::from_config(&ApiConfig {
            model: Some("m1".to_owned()),
            ..ApiConfig::default()
        });
        let body = to_value(provider.build_request(&messages)).unwrap();
        assert_eq!(body["model"], json!("m1"));
    }

    #[tokio::test]
    async fn test_streams_content_with_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("X-App-Id", "app-1"))
            .and(header("authorization", "Bearer key-1"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(sse_response(concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"收到\"}}]}\n\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"，马上处理\"}}]}\n\n",
                "data: [DONE]\n\n",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("key-1"));
        let mut updates = Vec::new();
        let mut record = |content: &str| updates.push(content.to_owned());

        let content = provider.stream_chat(&messages(), &mut record).await.unwrap();
        assert_eq!(content, "收到，马上处理");
        assert_eq!(updates, vec!["收到", "收到，马上处理"]);
    }

    #[tokio::test]
    async fn test_error_status_includes_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let mut ignore = |_: &str| {};

        match provider.stream_chat(&messages(), &mut ignore).await {
            Err(Error::Provider(message)) => {
                assert!(message.contains("500"), "unexpected message: {message}");
                assert!(message.contains("overloaded"), "unexpected message: {message}");
            }
            other => panic!("Expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_without_content_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(sse_response("data: [DONE]\n\n"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let mut ignore = |_: &str| {};

        let result = provider.stream_chat(&messages(), &mut ignore).await;
        assert!(matches!(result, Err(Error::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_key_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("authorization", "Bearer key-1"))
            .respond_with(sse_response(
                "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            ))
            .expect(0)
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);
        let mut ignore = |_: &str| {};

        // unmatched requests get a 404 from the mock server
        match provider.stream_chat(&messages(), &mut ignore).await {
            Err(Error::Provider(message)) => assert!(message.contains("404")),
            other => panic!("Expected provider error, got {other:?}"),
        }
    }
}
