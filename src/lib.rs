//! HTTP relay for Google Gemini's OpenAI-compatible chat API
//!
//! Forwards text prompts and uploaded image/audio files to Gemini as
//! multimodal chat completions and always answers with plain text.

pub mod ai;
pub mod error;
pub mod models;
pub mod prompts;
pub mod request;
pub mod response;
pub mod server;
pub mod service;

pub use error::{Error, Result};
