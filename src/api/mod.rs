pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::catalog::LanguageCatalog;

/// Body of `POST /translate`. Fields are optional here so a missing one is
/// reported as a malformed request by the handler.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeakQuery {
    pub text: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub slow: bool,
}

#[derive(Debug, Serialize)]
pub struct SpokenLanguagesResponse {
    pub languages: LanguageCatalog,
}
