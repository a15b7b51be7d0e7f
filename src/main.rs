use anyhow::Result;
use polyglot_bot::{config::Config, store::Preferences, telegram, translator};
use std::path::Path;
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
                .add_directive("polyglot_bot=info".parse()?),
        )
        .init();

    info!("Starting translation bot");

    // Load configuration from environment
    let config = Arc::new(Config::from_env()?);

    // Load preference stores (missing/corrupt files degrade to empty)
    let prefs = Arc::new(Preferences::load(Path::new(&config.data_dir)));

    // Build the configured translation backend
    let translator: Arc<dyn translator::Translator> =
        Arc::from(translator::from_config(&config)?);
    info!("Using translation backend: {}", translator.name());

    // Poll until interrupted; in-flight translations are best effort on
    // shutdown.
    tokio::select! {
        result = telegram::run(config, prefs, translator) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
