use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{SpeakQuery, SpokenLanguagesResponse, TranslateRequest};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::translate::{Translation, TranslationRequest};
use crate::tts::{SpeechRequest, AUDIO_MEDIA_TYPE};

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    Ok(Html(state.page.render()?))
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<Translation>, AppError> {
    let Json(payload) = payload?;

    let request = TranslationRequest {
        text: required(payload.text, "text")?,
        source_language: required(payload.source_language, "source_language")?
            .trim()
            .to_string(),
        target_language: required(payload.target_language, "target_language")?
            .trim()
            .to_string(),
    };

    let translation = state.translator.translate(&request).await?;

    Ok(Json(translation))
}

pub async fn spoken_languages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SpokenLanguagesResponse>, AppError> {
    let languages = state.speech.languages().await?;
    Ok(Json(SpokenLanguagesResponse { languages }))
}

pub async fn speak(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SpeakQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;

    let request = SpeechRequest {
        text: required(query.text, "text")?,
        lang: required(query.lang, "lang")?.trim().to_string(),
        slow: query.slow,
    };

    let audio = state.speech.synthesize(&request).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, AUDIO_MEDIA_TYPE)], audio).into_response())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(AppError::MalformedRequest(format!("{} cannot be empty", field))),
        None => Err(AppError::MalformedRequest(format!("{} is required", field))),
    }
}
