//! [`Llm`] over the chat-completions client.

use async_trait::async_trait;
use llm_client::{ChatRequest, LlmClient, LlmError, Message};

use crate::traits::{CompletionRequest, Llm};

#[async_trait]
impl Llm for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let mut chat = ChatRequest::new()
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(request.temperature);
        if let Some(max_tokens) = request.max_tokens {
            chat = chat.max_tokens(max_tokens);
        }

        Ok(self.chat_completion(chat).await?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_client::{ClientConfig, RetryPolicy};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_complete_sends_system_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    {"role": "system", "content": "Reply only with JSON."},
                    {"role": "user", "content": "Who was Ada Lovelace?"}
                ],
                "temperature": 0.3
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "{\"field\": \"mathematics\"}"}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(
            ClientConfig::new("sk-test")
                .with_base_url(server.uri())
                .with_min_request_interval(Duration::ZERO)
                .with_retry(RetryPolicy::none()),
        )
        .unwrap();
        let llm: &dyn Llm = &client;

        let reply = llm
            .complete(CompletionRequest::json("Reply only with JSON.", "Who was Ada Lovelace?"))
            .await
            .unwrap();
        assert_eq!(reply, "{\"field\": \"mathematics\"}");
    }
}
