//! Command handler: /setlang, /getlang, /setdefaultlang, /start, /help.
//!
//! Commands are the only writers of preference state; the pipeline never
//! mutates it. Invalid language codes are rejected here, synchronously,
//! before any write — they never reach the translation path.

use crate::config::Config;
use crate::i18n::{strings, Language};
use crate::store::{PrefSource, Preferences};
use crate::telegram::{self, Message};
use anyhow::Result;
use tracing::{info, warn};

/// Statuses allowed to change a group's default language.
const ADMIN_STATUSES: [&str; 2] = ["creator", "administrator"];

/// Split command text into the command (with any `@botname` suffix stripped)
/// and its first argument.
fn parse(text: &str) -> (String, Option<&str>) {
    let mut parts = text.split_whitespace();
    let command = parts
        .next()
        .unwrap_or("")
        .split('@')
        .next()
        .unwrap_or("")
        .to_string();
    (command, parts.next())
}

/// Handle one command message. Failures to reach Telegram propagate; bad
/// user input is answered, never an error.
pub async fn handle(
    config: &Config,
    client: &reqwest::Client,
    prefs: &Preferences,
    msg: &Message,
) -> Result<()> {
    let text = match msg.text.as_deref() {
        Some(t) => t.trim(),
        None => return Ok(()),
    };

    let sender_id = match msg.from.as_ref() {
        Some(user) if !user.is_bot => user.id,
        _ => return Ok(()),
    };

    let chat_id = msg.chat.id;
    let (command, arg) = parse(text);

    match command.as_str() {
        "/start" | "/help" => {
            telegram::send_message(config, client, chat_id, strings::HELP_TEXT).await
        }

        "/setlang" => {
            let code = match arg {
                Some(code) => code,
                None => {
                    return telegram::send_message(
                        config,
                        client,
                        chat_id,
                        strings::SETLANG_USAGE_REPLY,
                    )
                    .await
                }
            };
            match Language::from_code(code) {
                Ok(lang) => {
                    prefs.set_user_lang(sender_id, lang).await;
                    telegram::send_message(
                        config,
                        client,
                        chat_id,
                        &strings::user_lang_changed_reply(lang),
                    )
                    .await
                }
                Err(_) => {
                    telegram::send_message(
                        config,
                        client,
                        chat_id,
                        &strings::invalid_language_reply(code),
                    )
                    .await
                }
            }
        }

        "/getlang" => {
            // Same resolution the translation path uses, plus the level that won.
            let (lang, source) = prefs
                .resolve_with_source(sender_id, chat_id, msg.chat.is_group())
                .await;
            let source = match source {
                PrefSource::User => "your personal setting",
                PrefSource::Group => "this group's default",
                PrefSource::Default => "the global default",
            };
            telegram::send_message(
                config,
                client,
                chat_id,
                &strings::current_lang_reply(lang, source),
            )
            .await
        }

        "/setdefaultlang" => {
            if !msg.chat.is_group() {
                return telegram::send_message(
                    config,
                    client,
                    chat_id,
                    strings::GROUP_ONLY_REPLY,
                )
                .await;
            }

            let code = match arg {
                Some(code) => code,
                None => {
                    return telegram::send_message(
                        config,
                        client,
                        chat_id,
                        strings::SETDEFAULTLANG_USAGE_REPLY,
                    )
                    .await
                }
            };

            // Membership lookup failures deny by default; granting admin
            // rights on a lookup error would be worse than a refusal.
            let status = match telegram::chat_member_status(config, client, chat_id, sender_id)
                .await
            {
                Ok(status) => status,
                Err(e) => {
                    warn!("getChatMember failed for chat {}: {:#}", chat_id, e);
                    String::new()
                }
            };

            if !ADMIN_STATUSES.contains(&status.as_str()) {
                info!(
                    "Denied /setdefaultlang for user {} in chat {} (status: {})",
                    sender_id, chat_id, status
                );
                return telegram::send_message(
                    config,
                    client,
                    chat_id,
                    strings::PERMISSION_DENIED_REPLY,
                )
                .await;
            }

            match Language::from_code(code) {
                Ok(lang) => {
                    prefs.set_group_lang(chat_id, lang).await;
                    telegram::send_message(
                        config,
                        client,
                        chat_id,
                        &strings::group_lang_changed_reply(lang),
                    )
                    .await
                }
                Err(_) => {
                    telegram::send_message(
                        config,
                        client,
                        chat_id,
                        &strings::invalid_language_reply(code),
                    )
                    .await
                }
            }
        }

        // Unknown commands: answer with help in private chats, stay quiet in
        // groups where the command was probably aimed at another bot.
        _ => {
            if !msg.chat.is_group() {
                telegram::send_message(config, client, chat_id, strings::HELP_TEXT).await
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_command_with_argument() {
        let (command, arg) = parse("/setlang en");
        assert_eq!(command, "/setlang");
        assert_eq!(arg, Some("en"));
    }

    #[test]
    fn test_parse_command_without_argument() {
        let (command, arg) = parse("/getlang");
        assert_eq!(command, "/getlang");
        assert_eq!(arg, None);
    }

    #[test]
    fn test_parse_strips_bot_mention() {
        let (command, arg) = parse("/setlang@polyglot_bot ja");
        assert_eq!(command, "/setlang");
        assert_eq!(arg, Some("ja"));
    }

    #[test]
    fn test_parse_extra_arguments_ignored() {
        let (command, arg) = parse("/setdefaultlang fr please");
        assert_eq!(command, "/setdefaultlang");
        assert_eq!(arg, Some("fr"));
    }

    #[test]
    fn test_admin_statuses() {
        assert!(ADMIN_STATUSES.contains(&"creator"));
        assert!(ADMIN_STATUSES.contains(&"administrator"));
        assert!(!ADMIN_STATUSES.contains(&"member"));
        assert!(!ADMIN_STATUSES.contains(&""));
    }
}
