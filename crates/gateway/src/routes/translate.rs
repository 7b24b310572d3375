//! Translation preview, detection, and curated-entry routes.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub text: String,
    /// Detected from the text when absent.
    pub source: Option<String>,
    pub target: String,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub original: String,
    pub translated: String,
    pub from_lang: String,
    pub to_lang: String,
}

/// Translate a text without sending it, for compose-time preview.
pub async fn preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>> {
    let (translated, from_lang) = state
        .dispatcher
        .translate_preview(&req.text, req.source.as_deref(), &req.target)
        .await;
    Ok(Json(PreviewResponse {
        original: req.text,
        translated,
        from_lang,
        to_lang: req.target,
    }))
}

#[derive(Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct DetectResponse {
    pub language: String,
}

/// Best-effort language detection for a text.
pub async fn detect(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> Result<Json<DetectResponse>> {
    let language = state.dispatcher.translator().detect_language(&req.text).await;
    Ok(Json(DetectResponse { language }))
}

#[derive(Deserialize)]
pub struct CustomTranslationRequest {
    pub source: String,
    pub target: String,
    pub source_text: String,
    pub translated_text: String,
}

/// Add a curated translation overriding the engine for this text.
pub async fn add_custom(
    State(state): State<AppState>,
    Json(req): Json<CustomTranslationRequest>,
) -> Result<Json<serde_json::Value>> {
    let added = state
        .dispatcher
        .translator()
        .add_custom_translation(&req.source, &req.target, &req.source_text, &req.translated_text)
        .await
        .map_err(|e| match e {
            translator::TranslatorError::Storage(e) => GatewayError::Database(e),
            e => GatewayError::BadRequest(e.to_string()),
        })?;

    if !added {
        return Err(GatewayError::BadRequest(
            "all fields must be non-empty".to_string(),
        ));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// The supported language codes and display names.
pub async fn languages() -> Json<Vec<Language>> {
    Json(
        chat_core::SUPPORTED_LANGUAGES
            .iter()
            .map(|&(code, name)| Language { code, name })
            .collect(),
    )
}
