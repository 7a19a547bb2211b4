//! SSE streaming parser for chat completions.
//!
//! Converts a raw `reqwest` byte stream into `ChatCompletionChunk` values.
//! Handles `data: [DONE]`, partial lines, keep-alive comments and buffering.

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::LlmError;

/// A single chunk from a streaming chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionChunk {
    /// The text delta for this chunk.
    pub delta: String,
    /// Whether the stream is done.
    pub done: bool,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChunkRaw {
    #[serde(default)]
    choices: Vec<StreamChoiceRaw>,
}

#[derive(Debug, serde::Deserialize)]
struct StreamChoiceRaw {
    delta: DeltaRaw,
}

#[derive(Debug, serde::Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

/// Stream adapter that converts raw SSE bytes into `ChatCompletionChunk` values.
pub struct ChatCompletionStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
    buffer: String,
    finished: bool,
}

impl ChatCompletionStream {
    pub(crate) fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            buffer: String::new(),
            finished: false,
        }
    }

    /// Drain the stream and concatenate every delta.
    pub async fn collect_text(mut self) -> Result<String, LlmError> {
        let mut text = String::new();
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            if chunk.done {
                break;
            }
            text.push_str(&chunk.delta);
        }
        Ok(text)
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<ChatCompletionChunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            if let Some(chunk) = try_parse_line(&mut this.buffer) {
                if matches!(chunk, Ok(ChatCompletionChunk { done: true, .. })) {
                    this.finished = true;
                }
                return Poll::Ready(Some(chunk));
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => this.buffer.push_str(text),
                    Err(e) => {
                        return Poll::Ready(Some(Err(LlmError::Parse(format!(
                            "Invalid UTF-8 in stream: {}",
                            e
                        )))));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(LlmError::Network(e.to_string()))));
                }
                Poll::Ready(None) => {
                    // A final line may arrive without its trailing newline
                    if this.buffer.trim().is_empty() {
                        return Poll::Ready(None);
                    }
                    this.buffer.push('\n');
                    if let Some(chunk) = try_parse_line(&mut this.buffer) {
                        return Poll::Ready(Some(chunk));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Try to extract and parse a complete SSE line from the buffer.
/// Returns `None` if no complete data line is available yet.
fn try_parse_line(buffer: &mut String) -> Option<Result<ChatCompletionChunk, LlmError>> {
    loop {
        let newline_pos = buffer.find('\n')?;
        let line = buffer[..newline_pos].trim().to_string();
        buffer.drain(..=newline_pos);

        // Blank lines separate events; lines starting with ':' are keep-alive comments
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        let Some(data) = line.strip_prefix("data:") else {
            // "event:", "id:", "retry:"
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return Some(Ok(ChatCompletionChunk {
                delta: String::new(),
                done: true,
            }));
        }

        return Some(match serde_json::from_str::<StreamChunkRaw>(data) {
            Ok(raw) => {
                let delta = raw
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .unwrap_or_default();
                Ok(ChatCompletionChunk { delta, done: false })
            }
            Err(e) => Err(LlmError::Parse(format!(
                "Failed to parse stream chunk: {} (data: {})",
                e,
                crate::types::truncate_to_char_boundary(data, 200)
            ))),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sse_bytes(lines: &[&str]) -> Vec<Result<Bytes, reqwest::Error>> {
        lines
            .iter()
            .map(|line| Ok(Bytes::from(format!("{}\n", line))))
            .collect()
    }

    #[tokio::test]
    async fn test_parse_single_chunk() {
        let data = make_sse_bytes(&[
            r#"data: {"choices":[{"delta":{"content":"Born"}}]}"#,
            "",
            "data: [DONE]",
        ]);

        let mut stream = ChatCompletionStream::new(futures::stream::iter(data));

        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.delta, "Born");
        assert!(!chunk.done);

        let done = stream.next().await.unwrap().unwrap();
        assert!(done.done);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_keepalive_comments_are_skipped() {
        let data = make_sse_bytes(&[
            ": OPENROUTER PROCESSING",
            r#"data: {"choices":[{"delta":{"content":"Ulm"}}]}"#,
            "data: [DONE]",
        ]);

        let mut stream = ChatCompletionStream::new(futures::stream::iter(data));
        let chunk = stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.delta, "Ulm");
    }

    #[tokio::test]
    async fn test_split_across_byte_chunks() {
        let data: Vec<Result<Bytes, reqwest::Error>> = vec![
            Ok(Bytes::from(r#"data: {"choices":[{"del"#)),
            Ok(Bytes::from("ta\":{\"content\":\"1879\"}}]}\n\ndata: [DONE]\n")),
        ];

        let text = ChatCompletionStream::new(futures::stream::iter(data))
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "1879");
    }

    #[tokio::test]
    async fn test_collect_multiple_tokens() {
        let data = make_sse_bytes(&[
            r#"data: {"choices":[{"delta":{"content":"Albert"}}]}"#,
            "",
            r#"data: {"choices":[{"delta":{"content":" Einstein"}}]}"#,
            "",
            r#"data: {"choices":[{"delta":{}}]}"#,
            "data: [DONE]",
        ]);

        let text = ChatCompletionStream::new(futures::stream::iter(data))
            .collect_text()
            .await
            .unwrap();
        assert_eq!(text, "Albert Einstein");
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_parse_error() {
        let data = make_sse_bytes(&["data: {not json", "data: [DONE]"]);

        let mut stream = ChatCompletionStream::new(futures::stream::iter(data));
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }
}
