//! Validated `Language` value type.
//!
//! A `Language` can only be constructed from a code that passed registry
//! validation, so any `Language` reaching the store or a translation backend
//! is guaranteed to be in the supported set.

use crate::i18n::{registry, LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};

/// A language that has been validated against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "zh")
    code: &'static str,
}

impl Language {
    pub const CHINESE: Language = Language { code: "zh" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const JAPANESE: Language = Language { code: "ja" };

    /// Create a Language from a user-supplied code string.
    ///
    /// The code is normalized (trimmed, lowercased) before lookup, so
    /// `" EN "` resolves to English. Unknown codes are rejected.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unsupported language code: '{}'", code.trim()),
        }
    }

    /// The global default target language, used when neither the sender nor
    /// the group has a stored preference.
    pub fn default_target() -> Language {
        Language {
            code: registry::DEFAULT_TARGET_LANG,
        }
    }

    /// The ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full registry entry for this language.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a properly constructed `Language`.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("validated language code must be in the registry")
    }

    /// English name (e.g., "Chinese"), used to name the target language in
    /// translation prompts.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Native name (e.g., "中文"), used in user-facing confirmations.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }
}
