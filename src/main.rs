use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod catalog;
mod error;
mod page;
mod translate;
mod tts;

use api::routes::{create_router, AppState, DEFAULT_STATIC_DIR};
use error::AppError;
use page::{PageRenderer, TEMPLATES_DIR};
use translate::{GoogleTranslator, Translator};
use tts::GoogleTts;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Leeplate: A privacy-oriented alternative frontend for translation providers.",
    long_about = None
)]
struct Args {
    /// Host to run the server on
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Re-read page templates from disk on every request (development only)
    #[arg(long)]
    reload: bool,

    /// Timeout in seconds for each call to the translation and speech backends
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Directory served under /static
    #[arg(long, default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    tracing::info!("Leeplate v{}", env!("CARGO_PKG_VERSION"));

    // One client shared by both backends
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .user_agent(concat!("leeplate/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Startup(format!("Failed to build HTTP client: {}", e)))?;

    let translator = Arc::new(GoogleTranslator::new(client.clone()));
    let speech = Arc::new(GoogleTts::new(client));

    // The page cannot be served without the catalog, so this is fatal
    let catalog = translator
        .languages()
        .await
        .map_err(|e| AppError::Startup(format!("Failed to load language catalog: {}", e)))?;
    tracing::info!("Loaded {} translation languages", catalog.len());

    let page = if args.reload {
        tracing::warn!(
            "Reload enabled: templates are read from {} on every request",
            TEMPLATES_DIR
        );
        PageRenderer::with_reload(&catalog, TEMPLATES_DIR)
    } else {
        PageRenderer::new(&catalog)?
    };

    tracing::info!("Static directory: {}", args.static_dir.display());

    let state = Arc::new(AppState {
        translator,
        speech,
        page,
        static_dir: args.static_dir,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .map_err(|e| {
            AppError::Startup(format!(
                "Failed to bind to {}:{}: {}",
                args.host, args.port, e
            ))
        })?;

    tracing::info!("Starting server on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
