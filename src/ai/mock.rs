use super::types::{ChatChoice, ChatCompletionResponse, ChatMessage, ChatMessageContent};
use super::ChatClient;
use crate::request::ChatRequest;
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted chat client for tests.
///
/// Queued responses are replayed in order and cycle when exhausted; every
/// incoming request is captured for later inspection.
pub struct MockChatClient {
    responses: Arc<Mutex<Vec<Option<String>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a completion whose first choice carries `text`.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Some(text.into()));
        self
    }

    /// Queue a completion with an empty candidate list.
    pub fn with_empty_response(self) -> Self {
        self.responses.lock().unwrap().push(None);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The most recent request passed to [`ChatClient::call`].
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

fn make_response(text: Option<&str>) -> ChatCompletionResponse {
    match text {
        Some(text) => ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: Some(ChatMessageContent::Text(text.to_string())),
                },
                finish_reason: Some("stop".to_string()),
            }],
        },
        None => ChatCompletionResponse {
            choices: Vec::new(),
        },
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn call(&self, request: ChatRequest) -> Result<ChatCompletionResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(request);

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(make_response(Some("mock chat response")))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(make_response(responses[index].as_deref()))
        }
    }
}
