//! Request-scoped orchestration: build a request, make one upstream call,
//! normalize the result to display text.

use crate::ai::ChatClient;
use crate::request::{audio_request, image_request, text_request};
use crate::response;
use crate::Result;
use std::sync::Arc;

/// Stateless façade over the shared chat client.
///
/// Holds the configured default model and temperature for plain chat;
/// image and audio analysis pin their own options.
pub struct ChatService {
    client: Arc<dyn ChatClient>,
    model: String,
    temperature: f64,
}

impl ChatService {
    pub fn new(client: Arc<dyn ChatClient>, model: String, temperature: f64) -> Self {
        Self {
            client,
            model,
            temperature,
        }
    }

    /// Answers a plain text prompt with the configured model options.
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let request = text_request(prompt, &self.model, self.temperature);
        let response = self.client.call(request).await?;
        Ok(response::normalize(&response, response::NO_CHAT_RESULT))
    }

    /// Describes an uploaded image.
    pub async fn explain_image(&self, image: Vec<u8>) -> Result<String> {
        tracing::debug!("Explaining image ({} bytes)", image.len());
        let response = self.client.call(image_request(image)).await?;
        Ok(response::normalize(&response, response::NO_IMAGE_RESULT))
    }

    /// Analyzes an uploaded audio file, honoring its declared content type.
    pub async fn analyze_audio(
        &self,
        audio: Vec<u8>,
        declared_content_type: Option<&str>,
    ) -> Result<String> {
        tracing::debug!(
            "Analyzing audio ({} bytes, declared type {:?})",
            audio.len(),
            declared_content_type
        );
        let request = audio_request(audio, declared_content_type);
        let response = self.client.call(request).await?;
        Ok(response::normalize(&response, response::NO_AUDIO_RESULT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockChatClient;
    use crate::request::Message;
    use crate::response::NO_MODEL_TEXT;

    fn make_service(mock: Arc<MockChatClient>) -> ChatService {
        ChatService::new(mock, "gemini-2.5-flash".to_string(), 0.7)
    }

    #[tokio::test]
    async fn test_chat_uses_configured_options() {
        let mock = Arc::new(MockChatClient::new().with_text_response("안녕하세요"));
        let service = make_service(mock.clone());

        let answer = service.chat("hello").await.unwrap();
        assert_eq!(answer, "안녕하세요");

        let request = mock.last_request().unwrap();
        assert_eq!(request.options.model, "gemini-2.5-flash");
        assert_eq!(request.options.temperature, Some(0.7));
        assert_eq!(
            request.messages,
            vec![Message::User {
                text: "hello".to_string(),
                media: Vec::new(),
            }]
        );
    }

    #[tokio::test]
    async fn test_chat_absorbs_empty_completion() {
        let mock = Arc::new(MockChatClient::new().with_empty_response());
        let service = make_service(mock);

        let answer = service.chat("hello").await.unwrap();
        assert_eq!(answer, NO_MODEL_TEXT);
    }

    #[tokio::test]
    async fn test_explain_image_sends_pinned_options() {
        let mock = Arc::new(MockChatClient::new().with_text_response("붉은 노을 사진입니다."));
        let service = make_service(mock.clone());

        let answer = service.explain_image(vec![0x89, 0x50]).await.unwrap();
        assert_eq!(answer, "붉은 노을 사진입니다.");

        let request = mock.last_request().unwrap();
        assert_eq!(request.options.model, "gemini-2.5-flash");
        assert_eq!(request.options.temperature, None);
        assert_eq!(request.options.max_output_tokens, Some(2000));
        assert!(matches!(request.messages[0], Message::System(_)));
    }

    #[tokio::test]
    async fn test_analyze_audio_forwards_declared_type() {
        let mock = Arc::new(MockChatClient::new().with_text_response("빗소리입니다."));
        let service = make_service(mock.clone());

        service
            .analyze_audio(vec![1, 2, 3], Some("audio/mpeg"))
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        match &request.messages[1] {
            Message::User { media, .. } => {
                assert_eq!(media[0].mime_type.essence_str(), "audio/mpeg");
            }
            other => panic!("expected user message, got {:?}", other),
        }
        assert_eq!(request.options.temperature, Some(0.5));
    }
}
