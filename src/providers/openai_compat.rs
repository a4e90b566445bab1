//! OpenAI-compatible chat completions
//!
//! Works with any API that implements the OpenAI chat completions format
//! (OpenRouter, OpenAI, Groq, vLLM, LM Studio, ...).
//!
//! # Configuration
//!
//! ```toml
//! [llm]
//! base_url = "https://openrouter.ai/api/v1"
//! model = "qwen/qwen3-235b-a22b:free"
//! ```

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{prompts_builtin, AssistantConfig, LlmConfig};
use crate::conversation::{Role, Turn};
use crate::fallback;

use super::simulated::simulated_stream;
use super::sse::{SseDecoder, SseEvent};
use super::{ChatBackend, Completion, FragmentStream, ModelError, StreamingCompletion};

/// Gap between words when the fallback answer is replayed as a stream
pub const FALLBACK_WORD_DELAY: Duration = Duration::from_millis(50);

/// Wire form of a turn
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Turn> for ChatMessage<'a> {
    fn from(turn: &'a Turn) -> Self {
        Self {
            role: turn.role.as_str(),
            content: &turn.content,
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One streamed chunk
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// System turn, then `history` without system entries, then the new user turn
pub fn format_messages(system_prompt: &str, question: &str, history: &[Turn]) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);

    messages.push(Turn::system(system_prompt));
    messages.extend(history.iter().filter(|t| t.role != Role::System).cloned());
    messages.push(Turn::user(question));

    messages
}

/// Client for a single chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ModelClient {
    config: LlmConfig,
    system_prompt: String,
    http: Client,
    fallback_word_delay: Duration,
}

impl ModelClient {
    /// Create a client with its own HTTP connection pool
    pub fn new(config: LlmConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .connect_timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_http_client(config, http))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http_client(config: LlmConfig, http: Client) -> Self {
        Self {
            config,
            system_prompt: prompts_builtin::SYSTEM_PROMPT.to_string(),
            http,
            fallback_word_delay: FALLBACK_WORD_DELAY,
        }
    }

    /// Build from the full assistant configuration, honoring prompt overrides
    pub fn from_config(config: &AssistantConfig) -> Result<Self, ModelError> {
        Ok(Self::new(config.llm.clone())?.with_system_prompt(config.prompt.system_prompt()))
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_fallback_word_delay(mut self, delay: Duration) -> Self {
        self.fallback_word_delay = delay;
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Messages for a request: system prompt, filtered history, question
    pub fn format_messages(&self, question: &str, history: &[Turn]) -> Vec<Turn> {
        format_messages(&self.system_prompt, question, history)
    }

    /// One non-streaming completion. Failures come back as the fallback
    /// answer with `error` set.
    pub async fn complete_once(&self, question: &str, history: &[Turn]) -> Completion {
        match self.request_completion(question, history).await {
            Ok(content) => Completion {
                content,
                error: None,
            },
            Err(e) => {
                warn!("LLM API error, answering from fallback: {}", e);
                Completion {
                    content: fallback::respond(question),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Streaming completion. When the request cannot be started the fallback
    /// answer is replayed word by word instead, with `error` set.
    pub async fn complete_streaming(&self, question: &str, history: &[Turn]) -> StreamingCompletion {
        match self.open_stream(question, history).await {
            Ok(response) => StreamingCompletion {
                stream: fragment_stream(response, self.config.request_timeout()),
                error: None,
            },
            Err(e) => {
                warn!("LLM streaming API error, replaying fallback: {}", e);
                StreamingCompletion {
                    stream: simulated_stream(fallback::respond(question), self.fallback_word_delay),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// True when the configuration is valid and a trivial exchange succeeds.
    /// An invalid configuration is reported without touching the network.
    pub async fn check_health(&self) -> bool {
        if let Err(e) = self.config.validate() {
            info!("LLM health check skipped: {}", e);
            return false;
        }

        let healthy = self.complete_once("Hello", &[]).await.error.is_none();
        info!(healthy, model = %self.config.model, "LLM health check");
        healthy
    }

    fn build_request<'a>(&'a self, messages: &'a [Turn], stream: bool) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream,
        }
    }

    fn post(&self, request: &ChatCompletionRequest<'_>) -> RequestBuilder {
        let mut req_builder = self.http.post(self.config.endpoint());

        if let Some(ref api_key) = self.config.api_key {
            req_builder = req_builder.bearer_auth(api_key.trim());
        }

        // OpenRouter app attribution
        if let Some(ref url) = self.config.app_url {
            req_builder = req_builder.header("HTTP-Referer", url);
        }
        if let Some(ref title) = self.config.app_title {
            req_builder = req_builder.header("X-Title", title);
        }

        req_builder.json(request)
    }

    async fn request_completion(&self, question: &str, history: &[Turn]) -> Result<String, ModelError> {
        self.config.validate()?;

        let messages = self.format_messages(question, history);
        let request = self.build_request(&messages, false);
        debug!(model = %self.config.model, messages = messages.len(), "sending chat completion");

        let limit = self.config.request_timeout();
        let (status, body) = timeout(limit, async {
            let response = self.post(&request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, ModelError>((status, body))
        })
        .await
        .map_err(|_| ModelError::Timeout(limit))??;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ModelError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyContent)
    }

    async fn open_stream(&self, question: &str, history: &[Turn]) -> Result<Response, ModelError> {
        self.config.validate()?;

        let messages = self.format_messages(question, history);
        let request = self.build_request(&messages, true);
        debug!(model = %self.config.model, messages = messages.len(), "opening chat completion stream");

        let limit = self.config.request_timeout();
        let response = timeout(limit, self.post(&request).send())
            .await
            .map_err(|_| ModelError::Timeout(limit))??;

        let status = response.status();
        if !status.is_success() {
            // the error body gets the same budget as the headers
            let body = match timeout(limit, response.text()).await {
                Ok(Ok(body)) => body,
                Ok(Err(_)) => String::new(),
                Err(_) => {
                    warn!(status = status.as_u16(), "error body not received within {:?}", limit);
                    String::new()
                }
            };
            return Err(api_error(status, &body));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatBackend for ModelClient {
    async fn complete_once(&self, question: &str, history: &[Turn]) -> anyhow::Result<Completion> {
        Ok(ModelClient::complete_once(self, question, history).await)
    }

    async fn complete_streaming(
        &self,
        question: &str,
        history: &[Turn],
    ) -> anyhow::Result<StreamingCompletion> {
        Ok(ModelClient::complete_streaming(self, question, history).await)
    }

    async fn check_health(&self) -> bool {
        ModelClient::check_health(self).await
    }

    fn streams_by_default(&self) -> bool {
        self.config.stream
    }
}

fn api_error(status: StatusCode, body: &str) -> ModelError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error_resp) => error_resp.error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body.chars().take(200).collect(),
    };

    ModelError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Text of `choices[0].delta.content`, `None` for chunks without content
fn parse_delta(payload: &str) -> Result<Option<String>, ModelError> {
    let chunk: ChatCompletionChunk = serde_json::from_str(payload)
        .map_err(|e| ModelError::InvalidResponse(format!("Failed to parse stream chunk: {}", e)))?;

    if let Some(error) = chunk.error {
        return Err(ModelError::InvalidResponse(format!("Stream error: {}", error.message)));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

/// Turn an SSE response body into reply fragments. `idle` bounds the wait
/// for each network chunk.
fn fragment_stream(response: Response, idle: Duration) -> FragmentStream {
    Box::pin(async_stream::stream! {
        let mut body = Box::pin(response.bytes_stream());
        let mut decoder = SseDecoder::default();

        'read: loop {
            let chunk = match timeout(idle, body.next()).await {
                Err(_) => {
                    yield Err(ModelError::Timeout(idle));
                    break 'read;
                }
                Ok(Some(Err(e))) => {
                    yield Err(ModelError::RequestFailed(e));
                    break 'read;
                }
                Ok(Some(Ok(chunk))) => Some(chunk),
                Ok(None) => None,
            };

            let events = match chunk {
                Some(ref bytes) => decoder.feed(bytes),
                None => decoder.finish(),
            };

            for event in events {
                match event {
                    SseEvent::Done => break 'read,
                    SseEvent::Data(payload) => match parse_delta(&payload) {
                        Ok(Some(text)) => yield Ok(text),
                        Ok(None) => {}
                        Err(e) => {
                            yield Err(e);
                            break 'read;
                        }
                    },
                }
            }

            if chunk.is_none() {
                break 'read;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ModelClient {
        let mut config = LlmConfig::new("test-key", format!("{}/v1", server.uri()));
        config.model = "test-model".into();
        ModelClient::new(config)
            .unwrap()
            .with_system_prompt("You are an AI assistant for testing.")
            .with_fallback_word_delay(Duration::ZERO)
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "gen-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::from(": OPENROUTER PROCESSING\n\n");
        body.push_str("data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n");
        for fragment in fragments {
            let chunk = json!({ "choices": [{ "index": 0, "delta": { "content": fragment } }] });
            body.push_str(&format!("data: {}\n\n", chunk));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    async fn drain(stream: FragmentStream) -> Vec<Result<String, ModelError>> {
        stream.collect().await
    }

    #[test]
    fn test_format_messages() {
        let history = vec![Turn::user("Hello"), Turn::assistant("Hi there!")];
        let formatted = format_messages("system", "What services do you offer?", &history);

        assert_eq!(formatted.len(), 4);
        assert_eq!(formatted[0], Turn::system("system"));
        assert_eq!(formatted[1], Turn::user("Hello"));
        assert_eq!(formatted[2], Turn::assistant("Hi there!"));
        assert_eq!(formatted[3], Turn::user("What services do you offer?"));
    }

    #[test]
    fn test_format_messages_drops_history_system_turns() {
        let history = vec![
            Turn::system("System message"),
            Turn::user("User message"),
            Turn::assistant("Assistant message"),
        ];
        let formatted = format_messages("system", "Test message", &history);

        assert_eq!(formatted.len(), 4);
        assert_eq!(formatted.iter().filter(|t| t.role == Role::System).count(), 1);
        assert_eq!(formatted[0].content, "system");
    }

    #[test]
    fn test_message_conversion() {
        let turn = Turn::user("Hello");
        let chat_msg = ChatMessage::from(&turn);
        assert_eq!(chat_msg.role, "user");
        assert_eq!(chat_msg.content, "Hello");
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"No auth credentials found","code":401}}"#,
        );
        assert!(matches!(err, ModelError::Api { status: 401, ref message } if message == "No auth credentials found"));

        let err = api_error(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, ModelError::Api { status: 502, ref message } if message == "Bad Gateway"));
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(
            parse_delta(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap(),
            Some("Hi".to_string())
        );
        assert_eq!(parse_delta(r#"{"choices":[{"delta":{"content":""}}]}"#).unwrap(), None);
        assert_eq!(parse_delta(r#"{"choices":[],"usage":{"total_tokens":5}}"#).unwrap(), None);
        assert!(parse_delta("not json").is_err());
        assert!(parse_delta(r#"{"error":{"message":"overloaded"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_complete_once_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({ "model": "test-model", "stream": false, "max_tokens": 1000 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "This is a test response about our AI Workflow Hub services.",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let completion = client_for(&server)
            .complete_once("What services do you offer?", &[])
            .await;

        assert_eq!(
            completion.content,
            "This is a test response about our AI Workflow Hub services."
        );
        assert!(completion.error.is_none());
    }

    #[tokio::test]
    async fn test_request_carries_system_prompt_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    { "role": "system", "content": "You are an AI assistant for testing." },
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Hi there!" },
                    { "role": "user", "content": "And now?" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let history = [Turn::user("Hello"), Turn::assistant("Hi there!")];
        let completion = client_for(&server).complete_once("And now?", &history).await;
        assert_eq!(completion.content, "ok");
    }

    #[tokio::test]
    async fn test_complete_once_api_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": { "message": "Invalid API key" } })),
            )
            .mount(&server)
            .await;

        let question = "What services do you offer?";
        let completion = client_for(&server).complete_once(question, &[]).await;

        assert_eq!(completion.content, fallback::respond(question));
        let error = completion.error.unwrap();
        assert!(error.contains("401"));
        assert!(error.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_complete_once_malformed_and_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("  ")))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let malformed = client.complete_once("hello", &[]).await;
        assert!(malformed.error.unwrap().contains("Failed to parse response"));
        assert_eq!(malformed.content, fallback::respond("hello"));

        let empty = client.complete_once("hello", &[]).await;
        assert_eq!(empty.error.as_deref(), Some("No response content received from the model"));
    }

    #[tokio::test]
    async fn test_unreachable_transport_falls_back() {
        let config = LlmConfig::new("test-key", "http://127.0.0.1:1/v1");
        let client = ModelClient::new(config).unwrap();

        let question = "how many r in Strawberry";
        let completion = client.complete_once(question, &[]).await;

        assert!(!completion.content.is_empty());
        assert!(!completion.error.unwrap().is_empty());
        assert_eq!(completion.content, fallback::respond(question));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::new("", format!("{}/v1", server.uri()))
        };
        let client = ModelClient::new(config)
            .unwrap()
            .with_fallback_word_delay(Duration::ZERO);

        let completion = client.complete_once("What is 25 + 17?", &[]).await;
        assert!(completion.content.contains("25 + 17 = 42"));
        assert!(completion.error.unwrap().contains("not configured"));

        let streaming = client.complete_streaming("What is 25 + 17?", &[]).await;
        assert!(streaming.is_fallback());

        assert!(!client.check_health().await);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("too late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut client = client_for(&server);
        client.config.timeout_secs = 1;

        let completion = client.complete_once("hello", &[]).await;
        assert!(completion.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_streaming_stalled_error_body_falls_back() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = "HTTP/1.1 503 Service Unavailable\r\n\
                        content-type: application/json\r\n\
                        content-length: 200\r\n\r\n{\"error\":";
            socket.write_all(head.as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let mut config = LlmConfig::new("test-key", format!("http://{}/v1", addr));
        config.timeout_secs = 1;
        let client = ModelClient::new(config)
            .unwrap()
            .with_fallback_word_delay(Duration::ZERO);

        let question = "What services do you offer?";
        let streaming = timeout(Duration::from_secs(5), client.complete_streaming(question, &[]))
            .await
            .expect("complete_streaming should give up on the error body");
        assert!(streaming.error.as_deref().unwrap().contains("503"));

        let text: String = drain(streaming.stream)
            .await
            .into_iter()
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(text, format!("{} ", fallback::respond(question)));
    }

    #[tokio::test]
    async fn test_streaming_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({ "stream": true })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body(&["Visit ", "[Case Studies]", "(/AI-Workflow-Hub/case-studies)"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let streaming = client_for(&server)
            .complete_streaming("Show me some case studies", &[])
            .await;
        assert!(streaming.error.is_none());

        let fragments: Vec<String> = drain(streaming.stream)
            .await
            .into_iter()
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(
            fragments,
            vec!["Visit ", "[Case Studies]", "(/AI-Workflow-Hub/case-studies)"]
        );
    }

    #[tokio::test]
    async fn test_streaming_without_done_marker() {
        let server = MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let streaming = client_for(&server).complete_streaming("hi", &[]).await;
        let text: String = drain(streaming.stream)
            .await
            .into_iter()
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(text, "Hello world");
    }

    #[tokio::test]
    async fn test_streaming_pre_stream_failure_replays_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": { "message": "overloaded" } })))
            .mount(&server)
            .await;

        let question = "How do I navigate the website?";
        let streaming = client_for(&server).complete_streaming(question, &[]).await;
        assert!(streaming.error.as_deref().unwrap().contains("overloaded"));

        let text: String = drain(streaming.stream)
            .await
            .into_iter()
            .map(|item| item.unwrap())
            .collect();
        assert_eq!(text, format!("{} ", fallback::respond(question)));
    }

    #[tokio::test]
    async fn test_streaming_mid_stream_error_keeps_fragments() {
        let server = MockServer::start().await;
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"Partial\"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\" answer\"}}]}\n\n\
                    data: {broken\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n\n";
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let streaming = client_for(&server).complete_streaming("hi", &[]).await;
        assert!(streaming.error.is_none());

        let items = drain(streaming.stream).await;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_deref().unwrap(), "Partial");
        assert_eq!(items[1].as_deref().unwrap(), " answer");
        assert!(matches!(items[2], Err(ModelError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_check_health() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "messages": [{ "role": "system" }, { "role": "user", "content": "Hello" }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi! I'm Machan.")))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).check_health().await);
    }

    #[tokio::test]
    async fn test_check_health_reports_api_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server).check_health().await);
    }

    #[tokio::test]
    async fn test_backend_trait_never_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let backend: &dyn ChatBackend = &client;
        let completion = tokio_test::assert_ok!(backend.complete_once("hi", &[]).await);
        assert!(completion.is_fallback());
        assert!(backend.streams_by_default());
    }
}
