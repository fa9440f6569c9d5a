//! Chat client integration for the OpenAI-compatible Gemini API
//!
//! Provides the client seam the service layer calls through, the wire
//! payload types, and a mock implementation for tests.

pub mod client;
pub mod mock;
pub mod types;

pub use client::OpenAiChatClient;
pub use mock::MockChatClient;

use crate::request::ChatRequest;
use crate::Result;
use async_trait::async_trait;
use types::ChatCompletionResponse;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn call(&self, request: ChatRequest) -> Result<ChatCompletionResponse>;
}
