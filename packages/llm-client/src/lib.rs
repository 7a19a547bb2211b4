//! Chat-completions client for OpenRouter/OpenAI-compatible endpoints
//!
//! A small client with no domain logic: chat completions, SSE streaming,
//! a minimum interval between requests, and retry with exponential backoff
//! and jitter for transient failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{ChatRequest, ClientConfig, LlmClient, Message};
//!
//! let client = LlmClient::new(ClientConfig::new("sk-or-...").with_model("openai/gpt-4o-mini"))?;
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new()
//!             .message(Message::system("Reply only with JSON."))
//!             .message(Message::user("Who was Marie Curie?"))
//!             .temperature(0.3),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod retry;
pub mod schema;
pub mod streaming;
pub mod types;

pub use error::{LlmError, Result};
pub use retry::RetryPolicy;
pub use schema::StructuredOutput;
pub use streaming::{ChatCompletionChunk, ChatCompletionStream};
pub use types::*;

use governor::{Quota, RateLimiter};
use reqwest::{header, Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Connection and sampling defaults for [`LlmClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` (OpenRouter app attribution)
    pub http_referer: Option<String>,
    /// Sent as `X-Title`
    pub site_title: Option<String>,
    /// Minimum spacing between two requests; zero disables the limiter
    pub min_request_interval: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            top_p: 0.9,
            timeout: Duration::from_secs(300),
            http_referer: None,
            site_title: None,
            min_request_interval: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.http_referer = Some(referer.into());
        self.site_title = Some(title.into());
        self
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout", &self.timeout)
            .field("min_request_interval", &self.min_request_interval)
            .finish()
    }
}

/// Chat-completions client.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    config: ClientConfig,
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl LlmClient {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".into()));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let limiter = Quota::with_period(config.min_request_interval)
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Ok(Self {
            http_client,
            config,
            limiter,
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Default model for requests that do not name one.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Chat completion with rate limiting and retries.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let request = self.resolve(request, false);
        let start = std::time::Instant::now();

        let response = self
            .with_retries(|| async {
                let response = self.send(&request).await?;
                let raw: ChatResponseRaw = response
                    .json()
                    .await
                    .map_err(|e| LlmError::Parse(e.to_string()))?;
                Ok(raw)
            })
            .await?;

        let usage = response.usage;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("No choices in completion response".into()))?;

        debug!(
            model = request.model.as_deref().unwrap_or_default(),
            duration_ms = start.elapsed().as_millis() as u64,
            total_tokens = usage.as_ref().map(|u| u.total_tokens).unwrap_or_default(),
            "Chat completion"
        );

        Ok(ChatResponse { content, usage })
    }

    /// Streaming chat completion.
    ///
    /// Only establishing the stream is retried; errors mid-stream surface as
    /// stream items.
    pub async fn chat_completion_stream(&self, request: ChatRequest) -> Result<ChatCompletionStream> {
        let request = self.resolve(request, true);

        let response = self.with_retries(|| self.send(&request)).await?;

        Ok(ChatCompletionStream::new(response.bytes_stream()))
    }

    fn resolve(&self, mut request: ChatRequest, stream: bool) -> ChatRequest {
        request.model.get_or_insert_with(|| self.config.model.clone());
        request.temperature.get_or_insert(self.config.temperature);
        request.max_tokens.get_or_insert(self.config.max_tokens);
        request.top_p.get_or_insert(self.config.top_p);
        request.stream = stream.then_some(true);
        request
    }

    async fn with_retries<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let policy = &self.config.retry;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                    let delay = match &e {
                        LlmError::RateLimited { retry_after } => {
                            policy.delay_with_hint(attempt, *retry_after)
                        }
                        _ => policy.delay_for(attempt),
                    };
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "LLM request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(referer) = &self.config.http_referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.site_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.timeout.as_secs()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(LlmError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "LLM API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> ClientConfig {
        ClientConfig::new("sk-test")
            .with_base_url(server.uri())
            .with_min_request_interval(Duration::ZERO)
            .with_retry(RetryPolicy::default().with_base(Duration::from_millis(5)))
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": content}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = LlmClient::new(ClientConfig::new("  ")).err().unwrap();
        assert!(matches!(err, LlmError::Config(_)));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = ClientConfig::new("sk-super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_chat_completion_sends_defaults_and_attribution() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(header("X-Title", "Biography Source Curation"))
            .and(body_partial_json(json!({
                "model": "openai/gpt-4o-mini",
                "max_tokens": 4000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(
            test_config(&server).with_attribution("https://example.org", "Biography Source Curation"),
        )
        .unwrap();

        let response = client
            .chat_completion(ChatRequest::new().message(Message::user("ping")))
            .await
            .unwrap();

        assert_eq!(response.content, "{\"ok\":true}");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn test_rate_limited_then_success_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("done")))
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server)).unwrap();
        let response = client
            .chat_completion(ChatRequest::new().message(Message::user("ping")))
            .await
            .unwrap();

        assert_eq!(response.content, "done");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server)).unwrap();
        let err = client
            .chat_completion(ChatRequest::new().message(Message::user("ping")))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server)).unwrap();
        let err = client
            .chat_completion(ChatRequest::new().message(Message::user("ping")))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_stream_request_sets_stream_flag() {
        let server = MockServer::start().await;
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"Chapter\"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\" one\"}}]}\n\n\
                   data: [DONE]\n\n";
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
            .mount(&server)
            .await;

        let client = LlmClient::new(test_config(&server)).unwrap();
        let mut stream = client
            .chat_completion_stream(ChatRequest::new().message(Message::user("write")))
            .await
            .unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.delta, "Chapter");
        let rest = stream.collect_text().await.unwrap();
        assert_eq!(rest, " one");
    }
}
