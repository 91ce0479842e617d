//! # OpenAI-compatible Chat Provider
//!
//! Streams chat completions from an OpenAI-compatible
//! `/chat/completions` endpoint. The provider requests `stream: true`
//! and decodes the server-sent-event body incrementally, yielding each
//! `delta.content` fragment as soon as its line is complete. Requests
//! are issued with temperature zero so that answers grounded in the
//! same context are reproducible.

use crate::{
    errors::RagError,
    providers::ai::{ChatProvider, TokenStream},
};
use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// A provider for a local or hosted OpenAI-compatible chat API.
#[derive(Clone, Debug)]
pub struct OpenAiChatProvider {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiChatProvider {
    /// Creates a new `OpenAiChatProvider`.
    pub fn new(
        api_url: String,
        model: String,
        api_key: Option<String>,
    ) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            model,
            api_key,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn stream_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<TokenStream, RagError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.0,
            stream: true,
        };

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(RagError::ChatRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::ChatApi(error_text));
        }

        // Decode the SSE body incrementally. Event lines may be split
        // across network chunks, so the decoder carries a line buffer
        // between polls. The stream ends at `[DONE]` or when the
        // connection closes; a transport error terminates it with an
        // `Err` item.
        let token_stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(RagError::ChatStream))
            .scan(SseDecoder::default(), |decoder, chunk| {
                if decoder.done {
                    return future::ready(None);
                }
                let items: Vec<Result<String, RagError>> = match chunk {
                    Ok(bytes) => decoder.feed(&bytes).into_iter().map(Ok).collect(),
                    Err(e) => {
                        decoder.done = true;
                        vec![Err(e)]
                    }
                };
                future::ready(Some(stream::iter(items)))
            })
            .flatten();

        Ok(Box::pin(token_stream))
    }
}

/// Incremental decoder for an OpenAI-style SSE stream.
#[derive(Default)]
struct SseDecoder {
    buffer: String,
    done: bool,
}

impl SseDecoder {
    /// Consumes one network chunk and returns the completed tokens in it.
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        let mut tokens = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            match parse_sse_line(line.trim_end()) {
                SseLine::Token(token) => tokens.push(token),
                SseLine::Done => {
                    self.done = true;
                    break;
                }
                SseLine::Ignore => {}
            }
        }
        tokens
    }
}

enum SseLine {
    Token(String),
    Done,
    Ignore,
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.strip_prefix("data: ") else {
        return SseLine::Ignore;
    };
    if data.trim() == "[DONE]" {
        return SseLine::Done;
    }
    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(SseLine::Token)
            .unwrap_or(SseLine::Ignore),
        Err(_) => SseLine::Ignore,
    }
}
