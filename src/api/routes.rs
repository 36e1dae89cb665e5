use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::page::PageRenderer;
use crate::translate::Translator;
use crate::tts::SpeechSynthesizer;

/// Bundled frontend assets.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

pub struct AppState {
    pub translator: Arc<dyn Translator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub page: PageRenderer,
    pub static_dir: PathBuf,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/translate", post(handlers::translate))
        .route("/spoken-languages", get(handlers::spoken_languages))
        .route("/speak", get(handlers::speak))
        .nest_service("/static", static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{from_table, LanguageCatalog};
    use crate::error::AppError;
    use crate::translate::{Translation, TranslationRequest, AUTO_DETECT};
    use crate::tts::SpeechRequest;
    use async_trait::async_trait;
    use axum::{
        body::{Body, Bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    const MP3: &[u8] = b"ID3\x03\x00mock-mp3-frames";

    #[derive(Default)]
    struct MockTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn languages(&self) -> Result<LanguageCatalog, AppError> {
            Ok(from_table(&[("en", "english"), ("es", "spanish"), ("fr", "french")]))
        }

        async fn translate(&self, request: &TranslationRequest) -> Result<Translation, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if request.target_language == "xx" {
                return Err(AppError::UnsupportedLanguage("xx".into()));
            }
            if request.text == "fail" {
                return Err(AppError::ServiceError("backend down".into()));
            }

            let src = if request.source_language == AUTO_DETECT {
                "fr".to_string()
            } else {
                request.source_language.clone()
            };
            let text = match (request.text.as_str(), request.target_language.as_str()) {
                ("Hello", "es") => "Hola".to_string(),
                (other, dest) => format!("[{}] {}", dest, other),
            };

            Ok(Translation {
                text,
                origin: request.text.clone(),
                src,
                dest: request.target_language.clone(),
            })
        }
    }

    #[derive(Default)]
    struct MockSpeech {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSpeech {
        async fn languages(&self) -> Result<LanguageCatalog, AppError> {
            Ok(from_table(&[("en", "English"), ("es", "Spanish")]))
        }

        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.languages().await?.contains_key(&request.lang) {
                return Err(AppError::UnsupportedLanguage(request.lang.clone()));
            }
            Ok(MP3.to_vec())
        }
    }

    struct Harness {
        app: Router,
        translator: Arc<MockTranslator>,
        speech: Arc<MockSpeech>,
    }

    async fn harness() -> Harness {
        let translator = Arc::new(MockTranslator::default());
        let speech = Arc::new(MockSpeech::default());
        let catalog = translator.languages().await.unwrap();

        let state = Arc::new(AppState {
            translator: translator.clone(),
            speech: speech.clone(),
            page: PageRenderer::new(&catalog).unwrap(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        });

        Harness {
            app: create_router(state),
            translator,
            speech,
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_catalog() {
        let h = harness().await;
        let response = h.app.oneshot(get_req("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let html = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
        assert!(html.contains("Spanish"));
        assert!(html.contains(r#"<option value="en" selected>English</option>"#));
    }

    #[tokio::test]
    async fn test_translate_explicit_source() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(post_json(
                "/translate",
                json!({"text": "Hello", "source_language": "en", "target_language": "es"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"text": "Hola", "origin": "Hello", "src": "en", "dest": "es"})
        );
    }

    #[tokio::test]
    async fn test_translate_auto_keeps_requested_dest() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(post_json(
                "/translate",
                json!({"text": "Bonjour", "source_language": "auto", "target_language": "es"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["dest"], "es");
        assert_eq!(body["src"], "fr");
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_translate_missing_text_never_calls_backend() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(post_json(
                "/translate",
                json!({"source_language": "en", "target_language": "es"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "MALFORMED_REQUEST");
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translate_blank_fields_rejected() {
        for body in [
            json!({"text": "   ", "source_language": "en", "target_language": "es"}),
            json!({"text": "Hello", "source_language": "", "target_language": "es"}),
            json!({"text": "Hello", "source_language": "en", "target_language": null}),
        ] {
            let h = harness().await;
            let response = h.app.oneshot(post_json("/translate", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_translate_invalid_json_is_malformed() {
        let h = harness().await;
        let request = Request::builder()
            .method("POST")
            .uri("/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = h.app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "MALFORMED_REQUEST");
        assert_eq!(h.translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translate_unsupported_language() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(post_json(
                "/translate",
                json!({"text": "Hello", "source_language": "en", "target_language": "xx"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "UNSUPPORTED_LANGUAGE");
    }

    #[tokio::test]
    async fn test_translate_backend_failure_is_5xx() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(post_json(
                "/translate",
                json!({"text": "fail", "source_language": "en", "target_language": "es"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "SERVICE_ERROR");
        assert!(body.get("text").is_none());
    }

    #[tokio::test]
    async fn test_spoken_languages_proxies_backend() {
        let h = harness().await;
        let response = h.app.oneshot(get_req("/spoken-languages")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"languages": {"en": "English", "es": "Spanish"}})
        );
    }

    #[tokio::test]
    async fn test_speak_returns_mp3() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(get_req("/speak?text=Hello&lang=en"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mp3");
        let body = body_bytes(response).await;
        assert!(!body.is_empty());
        assert_eq!(&body[..], MP3);
    }

    #[tokio::test]
    async fn test_speak_is_not_cached() {
        let h = harness().await;
        for _ in 0..2 {
            let response = h
                .app
                .clone()
                .oneshot(get_req("/speak?text=Hello&lang=en"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(h.speech.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_speak_missing_params() {
        for uri in ["/speak?lang=en", "/speak?text=Hello", "/speak?text=&lang=en"] {
            let h = harness().await;
            let response = h.app.oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(h.speech.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_speak_unsupported_language() {
        let h = harness().await;
        let response = h
            .app
            .oneshot(get_req("/speak?text=Hello&lang=xx"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "UNSUPPORTED_LANGUAGE");
    }

    #[tokio::test]
    async fn test_static_assets_served() {
        let h = harness().await;
        let response = h.app.oneshot(get_req("/static/script.js")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_bytes(response).await;
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let h = harness().await;
        let response = h.app.oneshot(get_req("/detect_language")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
