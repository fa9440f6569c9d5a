//! Chat request construction.
//!
//! Builds the provider-independent request model for each entry point:
//! plain chat, image explanation, and audio analysis. Media attachments
//! carry a resolved MIME type; the wire encoding is the client's job.

use crate::prompts;
use mime::Mime;

/// Model used for image and audio analysis. The plain chat endpoint uses
/// the configured model instead.
const MULTIMODAL_MODEL: &str = "gemini-2.5-flash";
const MULTIMODAL_MAX_OUTPUT_TOKENS: u32 = 2000;
const AUDIO_TEMPERATURE: f64 = 0.5;

/// Ordered messages plus model options for a single completion call.
///
/// A `System` message, when present, precedes all `User` messages.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

/// One conversational turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(String),
    User { text: String, media: Vec<Media> },
}

/// Binary attachment embedded in a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub data: Vec<u8>,
    pub mime_type: Mime,
}

/// Per-request model options. Unset fields use the provider default.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

/// Builds a single-turn text request carrying `prompt` verbatim.
///
/// The empty string is accepted and passed through unchanged.
pub fn text_request(prompt: &str, model: &str, temperature: f64) -> ChatRequest {
    ChatRequest {
        messages: vec![Message::User {
            text: prompt.to_string(),
            media: Vec::new(),
        }],
        options: ChatOptions {
            model: model.to_string(),
            temperature: Some(temperature),
            max_output_tokens: None,
        },
    }
}

/// Builds an image-description request.
///
/// The attachment MIME type is always `image/png`, whatever the actual
/// encoding of `image` is: the upstream service accepts mislabeled JPEG
/// and WebP payloads, and the bytes are never sniffed. Known limitation.
pub fn image_request(image: Vec<u8>) -> ChatRequest {
    ChatRequest {
        messages: vec![
            Message::System(prompts::IMAGE_SYSTEM.to_string()),
            Message::User {
                text: prompts::IMAGE_USER.to_string(),
                media: vec![Media {
                    data: image,
                    mime_type: mime::IMAGE_PNG,
                }],
            },
        ],
        options: ChatOptions {
            model: MULTIMODAL_MODEL.to_string(),
            temperature: None,
            max_output_tokens: Some(MULTIMODAL_MAX_OUTPUT_TOKENS),
        },
    }
}

/// Builds an audio-analysis request.
///
/// `declared_content_type` is the upload's own declaration (for example
/// `audio/mpeg`); it is resolved, not trusted, see [`resolve_content_type`].
pub fn audio_request(audio: Vec<u8>, declared_content_type: Option<&str>) -> ChatRequest {
    ChatRequest {
        messages: vec![
            Message::System(prompts::AUDIO_SYSTEM.to_string()),
            Message::User {
                text: prompts::AUDIO_USER.to_string(),
                media: vec![Media {
                    data: audio,
                    mime_type: resolve_content_type(declared_content_type),
                }],
            },
        ],
        options: ChatOptions {
            model: MULTIMODAL_MODEL.to_string(),
            temperature: Some(AUDIO_TEMPERATURE),
            max_output_tokens: Some(MULTIMODAL_MAX_OUTPUT_TOKENS),
        },
    }
}

/// Resolves a declared content type to a usable MIME type.
///
/// Absent or unparseable declarations fall back to
/// `application/octet-stream`. No byte sniffing is performed.
pub fn resolve_content_type(declared: Option<&str>) -> Mime {
    declared
        .and_then(|raw| raw.trim().parse::<Mime>().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}
