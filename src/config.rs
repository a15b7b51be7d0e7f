use anyhow::{Context, Result};

/// Which translation backend to run against.
pub const BACKEND_OPENAI: &str = "openai";
pub const BACKEND_LIBRETRANSLATE: &str = "libretranslate";

#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub telegram_api_base: String,

    // Translation backend selection
    pub backend: String,

    // OpenAI-compatible backend
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,

    // LibreTranslate backend
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,

    // Preference storage
    pub data_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Telegram
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .context("TELEGRAM_BOT_TOKEN not set")?,
            telegram_api_base: std::env::var("TELEGRAM_API_BASE")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),

            // Backend selection; validated in translator::from_config
            backend: std::env::var("TRANSLATE_BACKEND")
                .unwrap_or_else(|_| BACKEND_OPENAI.to_string()),

            // OpenAI-compatible backend
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),

            // LibreTranslate backend
            libretranslate_url: std::env::var("LIBRETRANSLATE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            libretranslate_api_key: std::env::var("LIBRETRANSLATE_API_KEY").ok(),

            // Preference storage
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        })
    }
}
