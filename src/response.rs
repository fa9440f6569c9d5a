//! Response normalization.
//!
//! The caller-facing contract is "always return text": an upstream
//! completion with no usable output becomes a visible sentinel message
//! instead of an error. Sentinels are Korean, matching the rest of the
//! user-facing strings.

use crate::ai::types::{ChatCompletionResponse, ChatMessageContent, MessagePart};

/// Sentinel for a completion with no text output at all.
pub const NO_MODEL_TEXT: &str = "모델에서 출력된 Text가 없습니다.";

/// Operation-specific fallbacks for the final empty-string check.
pub const NO_CHAT_RESULT: &str = "모델에서 채팅 결과가 없습니다.";
pub const NO_IMAGE_RESULT: &str = "모델에서 이미지 설명 결과가 없습니다.";
pub const NO_AUDIO_RESULT: &str = "모델에서 오디오 분석 결과가 없습니다.";

/// Reduces a completion to a non-empty display string. Total: never errors.
///
/// Only the first choice is read. A missing choice, missing content, or
/// empty text yields [`NO_MODEL_TEXT`]; if the accumulated string is still
/// empty after that, `empty_fallback` is substituted.
pub fn normalize(response: &ChatCompletionResponse, empty_fallback: &str) -> String {
    let text = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_ref())
        .and_then(extract_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_MODEL_TEXT.to_string());

    if text.is_empty() {
        empty_fallback.to_string()
    } else {
        text
    }
}

fn extract_text(content: &ChatMessageContent) -> Option<String> {
    match content {
        ChatMessageContent::Text(text) => Some(text.clone()),
        ChatMessageContent::Parts(parts) => parts.iter().find_map(|part| match part {
            MessagePart {
                text: Some(text), ..
            } => Some(text.clone()),
            _ => None,
        }),
    }
}
