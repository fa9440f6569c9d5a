//! HTTP surface: chat, image explanation, audio analysis, health.
//!
//! Upload-read failures answer 200 with a prefixed plain-text message;
//! callers tell them apart by content, not status code. Upstream failures
//! map to 500, and the video route is explicitly unimplemented.

use crate::service::ChatService;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

const IMAGE_ERROR_PREFIX: &str = "이미지 설명 중 오류 발생: ";
const AUDIO_ERROR_PREFIX: &str = "오디오 분석 중 오류 발생: ";
const VIDEO_NOT_IMPLEMENTED: &str = "비디오 설명은 아직 구현되지 않았습니다.";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", get(chat))
        .route("/image/explain", get(explain_image))
        .route("/wav/explain", get(analyze_audio))
        .route("/video/explain", get(explain_video))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ChatParams {
    prompt: String,
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn chat(State(state): State<AppState>, Query(params): Query<ChatParams>) -> Response {
    match state.chat.chat(&params.prompt).await {
        Ok(text) => text.into_response(),
        Err(e) => {
            error!("Chat request failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn explain_image(State(state): State<AppState>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return upload_error_response(IMAGE_ERROR_PREFIX, e),
    };

    match state.chat.explain_image(upload.data).await {
        Ok(text) => text.into_response(),
        Err(e) => {
            error!("Image explanation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn analyze_audio(State(state): State<AppState>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return upload_error_response(AUDIO_ERROR_PREFIX, e),
    };

    match state
        .chat
        .analyze_audio(upload.data, upload.content_type.as_deref())
        .await
    {
        Ok(text) => text.into_response(),
        Err(e) => {
            error!("Audio analysis failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn explain_video() -> Response {
    (StatusCode::NOT_IMPLEMENTED, VIDEO_NOT_IMPLEMENTED).into_response()
}

struct Upload {
    data: Vec<u8>,
    content_type: Option<String>,
}

enum UploadError {
    MissingFile,
    Read(MultipartError),
}

/// Pulls the bytes and declared content type of the `file` multipart field.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(UploadError::Read)? {
        if field.name() == Some("file") {
            let content_type = field.content_type().map(|ct| ct.to_string());
            let data = field.bytes().await.map_err(UploadError::Read)?.to_vec();
            return Ok(Upload { data, content_type });
        }
    }

    Err(UploadError::MissingFile)
}

/// Read failures answer 200 with a prefixed message. A missing field is a
/// malformed request, not a read failure.
fn upload_error_response(prefix: &str, error: UploadError) -> Response {
    match error {
        UploadError::MissingFile => {
            (StatusCode::BAD_REQUEST, "multipart field \"file\" is required").into_response()
        }
        UploadError::Read(e) => {
            error!("Failed to read upload: {}", e);
            (StatusCode::OK, format!("{}{}", prefix, e)).into_response()
        }
    }
}
