//! Dedicated translation-API backend (LibreTranslate wire format).
//!
//! Sends the raw source text straight to a translation-specific endpoint with
//! no prompt engineering. Faster and cheaper than the chat-completion backend
//! at the cost of fluency.

use crate::i18n::Language;
use crate::translator::{ProviderError, Translator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug)]
pub struct LibreTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslator {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String, ProviderError> {
        let request = TranslateRequest {
            q: text,
            source: "auto",
            target: target.code(),
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "translation API returned {}: {}",
                status, body
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(body.translated_text.trim().to_string())
    }
}
