//! Telegram translation bot: relays every human message through a
//! translation backend and replies with the translated text, honoring a
//! per-user → per-group → global-default language preference hierarchy.

pub mod commands;
pub mod config;
pub mod i18n;
pub mod pipeline;
pub mod store;
pub mod telegram;
pub mod translator;
