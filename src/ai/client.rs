use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, ImageUrl,
    InputAudio, MessagePart,
};
use super::ChatClient;
use crate::request::{ChatRequest, Media, Message};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use std::time::Duration;

/// Chat client for an OpenAI-compatible completions endpoint.
///
/// Constructed once at startup and shared; holds no per-call state.
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    base_url: String,
    completions_path: String,
}

impl OpenAiChatClient {
    pub fn new(api_key: String, base_url: String, completions_path: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::new_with_client(api_key, base_url, completions_path, client)
    }

    pub fn new_with_client(
        api_key: String,
        base_url: String,
        completions_path: String,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            completions_path,
        }
    }

    fn to_wire(request: &ChatRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.options.model.clone(),
            messages: request.messages.iter().map(wire_message).collect(),
            temperature: request.options.temperature,
            max_completion_tokens: request.options.max_output_tokens,
        }
    }
}

fn wire_message(message: &Message) -> ChatMessage {
    match message {
        Message::System(text) => ChatMessage {
            role: "system".to_string(),
            content: Some(ChatMessageContent::Text(text.clone())),
        },
        Message::User { text, media } if media.is_empty() => ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::Text(text.clone())),
        },
        Message::User { text, media } => {
            let mut parts = vec![MessagePart {
                part_type: "text".to_string(),
                text: Some(text.clone()),
                image_url: None,
                input_audio: None,
            }];
            parts.extend(media.iter().map(wire_media_part));

            ChatMessage {
                role: "user".to_string(),
                content: Some(ChatMessageContent::Parts(parts)),
            }
        }
    }
}

/// Inlines an attachment as base64: images travel as `image_url` data URIs,
/// everything else as an `input_audio` part keyed by the MIME subtype.
fn wire_media_part(media: &Media) -> MessagePart {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&media.data);

    if media.mime_type.type_() == mime::IMAGE {
        MessagePart {
            part_type: "image_url".to_string(),
            text: None,
            image_url: Some(ImageUrl {
                url: format!("data:{};base64,{}", media.mime_type.essence_str(), encoded),
            }),
            input_audio: None,
        }
    } else {
        MessagePart {
            part_type: "input_audio".to_string(),
            text: None,
            image_url: None,
            input_audio: Some(InputAudio {
                data: encoded,
                format: media.mime_type.subtype().as_str().to_string(),
            }),
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn call(&self, request: ChatRequest) -> Result<ChatCompletionResponse> {
        tracing::debug!(
            model = %request.options.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let url = format!("{}{}", self.base_url, self.completions_path);
        let body = Self::to_wire(&request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{audio_request, image_request, text_request};
    use base64::Engine as _;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> OpenAiChatClient {
        OpenAiChatClient::new(
            "test-key".to_string(),
            server.uri(),
            "/chat/completions".to_string(),
        )
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
    }

    #[test]
    fn test_text_request_wire_shape() {
        let wire = OpenAiChatClient::to_wire(&text_request("hello", "gemini-2.5-flash", 0.7));
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "gemini-2.5-flash",
                "messages": [{ "role": "user", "content": "hello" }],
                "temperature": 0.7
            })
        );
    }

    #[test]
    fn test_image_request_wire_shape() {
        let wire = OpenAiChatClient::to_wire(&image_request(vec![1, 2, 3]));
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["max_completion_tokens"], 2000);
        assert!(json.get("temperature").is_none());
        assert_eq!(json["messages"][0]["role"], "system");

        let parts = json["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        let url = parts[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_audio_request_wire_shape() {
        let wire = OpenAiChatClient::to_wire(&audio_request(vec![1, 2, 3], Some("audio/wav")));
        let json = serde_json::to_value(&wire).unwrap();

        let parts = json["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts[1]["type"], "input_audio");
        assert_eq!(parts[1]["input_audio"]["format"], "wav");
        assert_eq!(
            parts[1]["input_audio"]["data"],
            base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3])
        );
    }

    #[test]
    fn test_unresolvable_content_type_maps_to_octet_stream_format() {
        let wire = OpenAiChatClient::to_wire(&audio_request(vec![1, 2, 3], None));
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(
            json["messages"][1]["content"][1]["input_audio"]["format"],
            "octet-stream"
        );
    }

    #[tokio::test]
    async fn test_call_parses_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(text_response("a quiet harbor at dusk"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let response = client
            .call(text_request("describe a harbor", "gemini-2.5-flash", 0.7))
            .await
            .unwrap();

        match &response.choices[0].message.content {
            Some(ChatMessageContent::Text(text)) => assert_eq!(text, "a quiet harbor at dusk"),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_sends_configured_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("\"model\":\"custom-model\""))
            .respond_with(text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        client
            .call(text_request("hi", "custom-model", 0.2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_call_inlines_image_media() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("data:image/png;base64,"))
            .respond_with(text_response("a red square"))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        client.call(image_request(vec![0xFF, 0xD8])).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .call(text_request("hi", "gemini-2.5-flash", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .call(text_request("hi", "gemini-2.5-flash", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
