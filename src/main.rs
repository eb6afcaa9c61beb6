use anyhow::Result;
use faq_backend::cache::Cache;
use faq_backend::config::Config;
use faq_backend::db::Database;
use faq_backend::server::{router, AppState};
use faq_backend::translator::Translator;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("faq_backend=info".parse()?),
        )
        .init();

    info!("Starting FAQ backend");

    // Load configuration from environment
    let config = Config::from_env()?;

    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::new(&config.database_path)?;
    info!("Database ready at {}", config.database_path);

    let state = AppState {
        db,
        cache: Arc::new(Cache::new()),
        translator: Translator::new(&config.translate_api_url, config.translate_api_key.clone()),
        source_lang: config.source_lang.clone(),
    };

    let app = router(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
