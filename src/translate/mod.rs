pub mod google;
pub mod languages;

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::LanguageCatalog;
use crate::error::AppError;

pub use google::GoogleTranslator;

/// Source language sentinel asking the backend to detect the language.
pub const AUTO_DETECT: &str = "auto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// Translated text
    pub text: String,
    /// Input text as the backend read it
    pub origin: String,
    /// Resolved source language; the detected one when `auto` was requested
    pub src: String,
    pub dest: String,
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Every language this backend can translate from or to.
    async fn languages(&self) -> Result<LanguageCatalog, AppError>;

    async fn translate(&self, request: &TranslationRequest) -> Result<Translation, AppError>;
}
