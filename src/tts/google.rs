use async_trait::async_trait;
use reqwest::Client;

use super::languages::{self, LANGUAGES};
use super::{tokenizer, SpeechRequest, SpeechSynthesizer};
use crate::catalog::{self, LanguageCatalog};
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://translate.google.com";

/// Client for the Google Translate speech endpoint.
pub struct GoogleTts {
    client: Client,
    base_url: String,
}

impl GoogleTts {
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
impl SpeechSynthesizer for GoogleTts {
    async fn languages(&self) -> Result<LanguageCatalog, AppError> {
        Ok(catalog::from_table(LANGUAGES))
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, AppError> {
        let lang = languages::resolve(&request.lang).ok_or_else(|| {
            AppError::UnsupportedLanguage(format!(
                "language '{}' is not supported for speech",
                request.lang
            ))
        })?;

        let chunks = tokenizer::chunk(&request.text);
        if chunks.is_empty() {
            return Err(AppError::MalformedRequest("No text to speak".into()));
        }

        let url = format!("{}/translate_tts", self.base_url);
        let speed = if request.slow { "0.3" } else { "1" };
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();

            let bytes = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("q", chunk.as_str()),
                    ("tl", lang),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                    ("ttsspeed", speed),
                ])
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;

            if bytes.is_empty() {
                return Err(AppError::ServiceError(format!(
                    "empty audio for chunk {} of {}",
                    idx, total
                )));
            }

            audio.extend_from_slice(&bytes);
        }

        tracing::debug!(
            "Synthesized {} chunks in {} ({} bytes)",
            total,
            lang,
            audio.len()
        );

        Ok(audio)
    }
}
