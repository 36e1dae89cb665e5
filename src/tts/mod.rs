pub mod google;
pub mod languages;
pub mod tokenizer;

use async_trait::async_trait;

use crate::catalog::LanguageCatalog;
use crate::error::AppError;

pub use google::GoogleTts;

/// Media type of every synthesized payload.
pub const AUDIO_MEDIA_TYPE: &str = "audio/mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: String,
    pub slow: bool,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Languages this backend can speak, as reported by the backend itself.
    async fn languages(&self) -> Result<LanguageCatalog, AppError>;

    /// Produce the complete MP3 payload for `request` in memory.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, AppError>;
}
