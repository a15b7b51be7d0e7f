//! Preference store: per-user and per-group target-language records.
//!
//! Each collection is an in-memory map that is the source of truth, backed by
//! a flat JSON document rewritten in full on every mutation. A missing or
//! corrupt file on startup degrades to an empty store (logged, not fatal),
//! and a failed write degrades to in-memory-only state; neither condition is
//! ever surfaced to the chat. All mutation goes through a `tokio::sync::Mutex`
//! per collection, which serializes concurrent writes to the same key and
//! gives read-after-write consistency within the process.

use crate::i18n::Language;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Which precedence level supplied a resolved target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefSource {
    User,
    Group,
    Default,
}

/// One stored preference: the validated target language and when it was set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefRecord {
    pub target_lang: String,
    pub updated_at: DateTime<Utc>,
}

/// A single preference collection backed by one JSON file.
///
/// Used for both user-keyed and chat-keyed preferences; the two collections
/// differ only in which id they are keyed by.
#[derive(Debug)]
struct LangStore {
    path: PathBuf,
    map: HashMap<i64, PrefRecord>,
}

impl LangStore {
    /// Load a collection from disk. Missing or unreadable files yield an
    /// empty store; the bot keeps running with degraded personalization.
    fn load(path: PathBuf) -> Self {
        let map = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Corrupt preference file {}, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No preference file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                warn!("Failed to read {}, starting empty: {}", path.display(), e);
                HashMap::new()
            }
        };
        Self { path, map }
    }

    fn get(&self, id: i64) -> Option<Language> {
        self.map
            .get(&id)
            .and_then(|record| Language::from_code(&record.target_lang).ok())
    }

    /// Insert or overwrite a record, then rewrite the backing file in full.
    /// The in-memory map is updated even when the write fails.
    fn set(&mut self, id: i64, lang: Language) {
        self.map.insert(
            id,
            PrefRecord {
                target_lang: lang.code().to_string(),
                updated_at: Utc::now(),
            },
        );
        if let Err(e) = self.persist() {
            warn!("Failed to persist {}: {:#}", self.path.display(), e);
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(&self.map)
            .context("Failed to serialize preferences")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Both preference collections plus the target-language resolver.
pub struct Preferences {
    users: Mutex<LangStore>,
    groups: Mutex<LangStore>,
}

impl Preferences {
    /// Load both collections from `data_dir`.
    pub fn load(data_dir: &Path) -> Self {
        Self {
            users: Mutex::new(LangStore::load(data_dir.join("user_langs.json"))),
            groups: Mutex::new(LangStore::load(data_dir.join("group_langs.json"))),
        }
    }

    pub async fn user_lang(&self, user_id: i64) -> Option<Language> {
        self.users.lock().await.get(user_id)
    }

    pub async fn set_user_lang(&self, user_id: i64, lang: Language) {
        self.users.lock().await.set(user_id, lang);
        info!("User {} target language set to {}", user_id, lang.code());
    }

    pub async fn group_lang(&self, chat_id: i64) -> Option<Language> {
        self.groups.lock().await.get(chat_id)
    }

    pub async fn set_group_lang(&self, chat_id: i64, lang: Language) {
        self.groups.lock().await.set(chat_id, lang);
        info!("Group {} default language set to {}", chat_id, lang.code());
    }

    /// Resolve the target language for one message.
    ///
    /// Precedence: sender's stored preference, then (group chats only) the
    /// group's stored preference, then the global default. Absence of a
    /// record is the normal case, never an error.
    pub async fn resolve(&self, user_id: i64, chat_id: i64, is_group: bool) -> Language {
        self.resolve_with_source(user_id, chat_id, is_group).await.0
    }

    /// Like [`resolve`](Self::resolve), but also reports which precedence
    /// level won. Used by /getlang to name where the setting came from.
    pub async fn resolve_with_source(
        &self,
        user_id: i64,
        chat_id: i64,
        is_group: bool,
    ) -> (Language, PrefSource) {
        if let Some(lang) = self.user_lang(user_id).await {
            return (lang, PrefSource::User);
        }
        if is_group {
            if let Some(lang) = self.group_lang(chat_id).await {
                return (lang, PrefSource::Group);
            }
        }
        (Language::default_target(), PrefSource::Default)
    }
}
