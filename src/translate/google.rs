use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::languages::{normalize, LANGUAGES};
use super::{Translation, TranslationRequest, Translator, AUTO_DETECT};
use crate::catalog::{self, LanguageCatalog};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Client for the public Google Translate web endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn languages(&self) -> Result<LanguageCatalog, AppError> {
        Ok(catalog::from_table(LANGUAGES))
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<Translation, AppError> {
        let src = if request.source_language.trim().eq_ignore_ascii_case(AUTO_DETECT) {
            AUTO_DETECT.to_string()
        } else {
            normalize(&request.source_language).ok_or_else(|| {
                AppError::UnsupportedLanguage(format!(
                    "invalid source language '{}'",
                    request.source_language
                ))
            })?
        };
        let dest = normalize(&request.target_language).ok_or_else(|| {
            AppError::UnsupportedLanguage(format!(
                "invalid destination language '{}'",
                request.target_language
            ))
        })?;

        tracing::debug!(
            "Translating {} chars from {} to {}",
            request.text.chars().count(),
            src,
            dest
        );

        let url = format!("{}/translate_a/single", self.base_url);
        let data: Value = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", src.as_str()),
                ("tl", dest.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&data, &request.text, &src, &dest)
    }
}

/// Reshape the nested array answer of `translate_a/single`.
///
/// `data[0]` holds one `[translated, original, ...]` entry per sentence and
/// `data[2]` the detected source language.
fn parse_response(
    data: &Value,
    input: &str,
    src: &str,
    dest: &str,
) -> Result<Translation, AppError> {
    let sentences = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::ServiceError("unexpected translation response".into()))?;

    let mut text = String::new();
    let mut origin = String::new();
    for sentence in sentences {
        if let Some(translated) = sentence.get(0).and_then(Value::as_str) {
            text.push_str(translated);
        }
        if let Some(original) = sentence.get(1).and_then(Value::as_str) {
            origin.push_str(original);
        }
    }

    if origin.is_empty() {
        origin = input.to_string();
    }

    let src = if src == AUTO_DETECT {
        data.get(2)
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .ok_or_else(|| {
                AppError::ServiceError("translation response has no detected language".into())
            })?
    } else {
        src.to_string()
    };

    Ok(Translation {
        text,
        origin,
        src,
        dest: dest.to_string(),
    })
}
