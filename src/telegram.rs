//! Telegram Bot API boundary: wire types, the long-polling update loop, and
//! send helpers.
//!
//! The loop subscribes to new and edited messages (captions included), routes
//! command text to `commands`, and hands everything else to the pipeline in a
//! spawned task so one in-flight translation never blocks the next poll.

use crate::commands;
use crate::config::Config;
use crate::pipeline::{self, Action, Inbound};
use crate::store::Preferences;
use crate::translator::Translator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Long-poll window; the request timeout leaves headroom over it.
const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_REQUEST_TIMEOUT: Duration = Duration::from_secs(35);
/// Default timeout for every other API call. A stalled send or membership
/// lookup must fail, not wedge the update loop; getUpdates overrides this
/// per request with `POLL_REQUEST_TIMEOUT`.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_BACKOFF_SECS: u64 = 60;

// ==================== Wire Types ====================

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub edited_message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}

impl Chat {
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_parameters: Option<ReplyParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_preview_options: Option<LinkPreviewOptions>,
}

#[derive(Debug, Serialize)]
struct ReplyParameters {
    message_id: i64,
    /// The reply must not fail merely because the original was deleted.
    allow_sending_without_reply: bool,
}

#[derive(Debug, Serialize)]
struct LinkPreviewOptions {
    is_disabled: bool,
}

// ==================== Update Handling ====================

/// Pick the message out of an update. Edited messages are translated exactly
/// like new ones.
pub fn extract_message(update: &Update) -> Option<&Message> {
    update.message.as_ref().or(update.edited_message.as_ref())
}

/// Build the pipeline's transport-free view of a message. Returns `None`
/// when the message carries neither text nor caption.
pub fn to_inbound(msg: &Message) -> Option<Inbound> {
    let text = msg.text.as_ref().or(msg.caption.as_ref())?;
    Some(Inbound {
        message_id: msg.message_id,
        chat_id: msg.chat.id,
        is_group: msg.chat.is_group(),
        sender_id: msg.from.as_ref().map(|user| user.id),
        sender_is_bot: msg.from.as_ref().map(|user| user.is_bot).unwrap_or(false),
        text: text.clone(),
    })
}

fn method_url(config: &Config, method: &str) -> String {
    format!(
        "{}/bot{}/{}",
        config.telegram_api_base.trim_end_matches('/'),
        config.telegram_bot_token,
        method
    )
}

/// Shared API client with a bounded default timeout.
fn api_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(API_REQUEST_TIMEOUT)
        .build()
        .context("Failed to build Telegram HTTP client")
}

/// Long-polling loop. Runs until the update receiver side fails fatally;
/// transient poll errors back off exponentially and recover.
pub async fn run(
    config: Arc<Config>,
    prefs: Arc<Preferences>,
    translator: Arc<dyn Translator>,
) -> Result<()> {
    let client = api_client()?;
    let mut offset: Option<i64> = None;
    let mut backoff_secs: u64 = 1;

    info!("Starting Telegram long polling");

    loop {
        let mut url = format!(
            "{}?timeout={}",
            method_url(&config, "getUpdates"),
            POLL_TIMEOUT_SECS
        );
        if let Some(off) = offset {
            url.push_str(&format!("&offset={}", off));
        }

        let response = match client
            .get(&url)
            .timeout(POLL_REQUEST_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Poll failed (retry in {}s): {}", backoff_secs, e);
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
        };

        let body: ApiResponse<Vec<Update>> = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                error!("Poll parse failed (retry in {}s): {}", backoff_secs, e);
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
                continue;
            }
        };

        if !body.ok {
            error!(
                "Telegram API error (retry in {}s): {}",
                backoff_secs,
                body.description.unwrap_or_default()
            );
            tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            backoff_secs = (backoff_secs * 2).min(MAX_BACKOFF_SECS);
            continue;
        }

        backoff_secs = 1;

        let updates = body.result.unwrap_or_default();
        if let Some(last) = updates.last() {
            offset = Some(last.update_id + 1);
        }

        for update in &updates {
            let msg = match extract_message(update) {
                Some(m) => m,
                None => continue,
            };

            let inbound = match to_inbound(msg) {
                Some(i) => i,
                None => continue,
            };

            if inbound.text.trim().starts_with('/') {
                // Commands run inline; preference writes are serialized anyway
                // and every call on this client is time-bounded.
                if let Err(e) = commands::handle(&config, &client, &prefs, msg).await {
                    warn!("Command handling failed for chat {}: {:#}", msg.chat.id, e);
                }
                continue;
            }

            // Each translatable message is an independent unit of work.
            let config = Arc::clone(&config);
            let prefs = Arc::clone(&prefs);
            let translator = Arc::clone(&translator);
            let client = client.clone();
            tokio::spawn(async move {
                let action = pipeline::handle(&inbound, &prefs, translator.as_ref()).await;
                if let Err(e) = dispatch(&config, &client, &inbound, action).await {
                    warn!("Reply failed for chat {}: {:#}", inbound.chat_id, e);
                }
            });
        }
    }
}

/// Turn a pipeline action into Telegram API calls.
async fn dispatch(
    config: &Config,
    client: &reqwest::Client,
    inbound: &Inbound,
    action: Action,
) -> Result<()> {
    match action {
        Action::Reply(text) | Action::ReportError(text) => {
            send_reply(config, client, inbound.chat_id, inbound.message_id, &text).await
        }
        Action::Suppress => Ok(()),
    }
}

/// Send a threaded reply with link previews disabled.
pub async fn send_reply(
    config: &Config,
    client: &reqwest::Client,
    chat_id: i64,
    reply_to: i64,
    text: &str,
) -> Result<()> {
    let request = SendMessageRequest {
        chat_id,
        text,
        reply_parameters: Some(ReplyParameters {
            message_id: reply_to,
            allow_sending_without_reply: true,
        }),
        link_preview_options: Some(LinkPreviewOptions { is_disabled: true }),
    };
    post_send_message(config, client, &request).await
}

/// Send a plain (non-threaded) message; used for command replies.
pub async fn send_message(
    config: &Config,
    client: &reqwest::Client,
    chat_id: i64,
    text: &str,
) -> Result<()> {
    let request = SendMessageRequest {
        chat_id,
        text,
        reply_parameters: None,
        link_preview_options: None,
    };
    post_send_message(config, client, &request).await
}

async fn post_send_message(
    config: &Config,
    client: &reqwest::Client,
    request: &SendMessageRequest<'_>,
) -> Result<()> {
    let response = client
        .post(method_url(config, "sendMessage"))
        .json(request)
        .send()
        .await
        .context("Failed to send message to Telegram")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Telegram sendMessage error ({}): {}", status, body);
    }

    Ok(())
}

/// Membership status of a user in a chat ("creator", "administrator",
/// "member", ...). Used by the admin gate on /setdefaultlang.
pub async fn chat_member_status(
    config: &Config,
    client: &reqwest::Client,
    chat_id: i64,
    user_id: i64,
) -> Result<String> {
    let url = format!(
        "{}?chat_id={}&user_id={}",
        method_url(config, "getChatMember"),
        chat_id,
        user_id
    );

    let body: ApiResponse<ChatMember> = client
        .get(&url)
        .send()
        .await
        .context("Failed to call getChatMember")?
        .json()
        .await
        .context("Failed to parse getChatMember response")?;

    body.result
        .map(|member| member.status)
        .with_context(|| {
            format!(
                "getChatMember returned no result: {}",
                body.description.unwrap_or_default()
            )
        })
}
