//! Translation backends behind one swappable trait.
//!
//! The pipeline is written against `Translator` only; which concrete backend
//! runs is decided by configuration at startup, never by code changes. Both
//! backends expose the same contract: translate text into a validated target
//! language, or fail with a classified `ProviderError`. Failures are not
//! retried here; the pipeline decides what the user sees.

mod libre;
mod openai;

pub use libre::LibreTranslator;
pub use openai::OpenAiTranslator;

use crate::config::{Config, BACKEND_LIBRETRANSLATE, BACKEND_OPENAI};
use crate::i18n::Language;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use thiserror::Error;

/// Why a translation call produced no usable text.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote call could not complete: network error, timeout, or a
    /// non-success HTTP status.
    #[error("translation backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered, but the response could not be parsed into a
    /// translated text.
    #[error("translation backend returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// A remote translation backend.
#[async_trait]
pub trait Translator: Send + Sync + std::fmt::Debug {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Translate `text` into `target`. The returned text is trimmed.
    async fn translate(&self, text: &str, target: Language) -> Result<String, ProviderError>;
}

/// Build the configured backend.
pub fn from_config(config: &Config) -> Result<Box<dyn Translator>> {
    match config.backend.as_str() {
        BACKEND_OPENAI => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("OPENAI_API_KEY not set (required for the openai backend)")?;
            Ok(Box::new(OpenAiTranslator::new(
                config.openai_api_url.clone(),
                api_key,
                config.openai_model.clone(),
            )))
        }
        BACKEND_LIBRETRANSLATE => Ok(Box::new(LibreTranslator::new(
            config.libretranslate_url.clone(),
            config.libretranslate_api_key.clone(),
        ))),
        other => bail!(
            "Unknown TRANSLATE_BACKEND '{}', expected '{}' or '{}'",
            other,
            BACKEND_OPENAI,
            BACKEND_LIBRETRANSLATE
        ),
    }
}
