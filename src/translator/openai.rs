//! Chat-completion translation backend.
//!
//! Wraps a generic OpenAI-compatible chat API with a fixed two-message
//! prompt. Slower and costlier than a dedicated translation API, but much
//! better at tone: the prompt explicitly asks for natural, idiomatic output
//! rather than word-for-word "translationese".

use crate::i18n::Language;
use crate::translator::{ProviderError, Translator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Large-model calls are slow; give them more room than a dedicated API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Low temperature keeps the translation stable across retries by the user.
const TEMPERATURE: f32 = 0.3;

/// Generous ceiling so long messages are not truncated mid-sentence.
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

fn system_prompt() -> String {
    "You are an expert multilingual translator. You translate messages \
     faithfully and idiomatically, preserving the tone and emotional register \
     of the original. You never add commentary, explanations, or quotation \
     marks around your output."
        .to_string()
}

fn user_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate the following message into {}. Produce a natural, \
         idiomatic translation, not a literal word-for-word one, and avoid \
         translationese. Reply with the translation only.\n\n{}",
        target.name(),
        text
    )
}

#[derive(Debug)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiTranslator {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn translate(&self, text: &str, target: Language) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt(text, target),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unavailable(format!(
                "chat API returned {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let translated = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("chat response contained no choices".to_string())
            })?;

        Ok(translated)
    }
}
