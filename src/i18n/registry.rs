//! Language registry: single source of truth for all supported target languages.
//!
//! The registry is a fixed, process-wide table initialized once via `OnceLock`.
//! Validation is case-insensitive and whitespace-insensitive but otherwise
//! exact-match: no fuzzy matching and no locale negotiation (`en-US` is not `en`).

use std::sync::OnceLock;

/// Language code every message falls back to when neither the sender nor the
/// group has a stored preference.
pub const DEFAULT_TARGET_LANG: &str = "zh";

/// Metadata for one supported target language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "zh")
    pub code: &'static str,

    /// English name, used when naming the target language in prompts
    pub name: &'static str,

    /// Native name, used in user-facing confirmations
    pub native_name: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

/// Normalize a user-supplied language code before any comparison or storage:
/// trim surrounding whitespace and lowercase.
pub fn normalize(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

impl LanguageRegistry {
    /// Get the global registry instance, initializing it on first access.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: supported_languages(),
        })
    }

    /// Look up a language by code (normalized before comparison).
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        let code = normalize(code);
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Whether a code (in any casing, with any surrounding whitespace) is in
    /// the supported set.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Human-readable English name for a code, falling back to the raw code
    /// when unknown. Used for prompt construction and display only, never for
    /// validation.
    pub fn display_name(&self, code: &str) -> String {
        match self.get_by_code(code) {
            Some(config) => config.name.to_string(),
            None => code.to_string(),
        }
    }

    /// All supported languages, in registry order.
    pub fn list(&self) -> &[LanguageConfig] {
        &self.languages
    }
}

/// The fixed supported-language table.
fn supported_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "zh",
            name: "Chinese",
            native_name: "中文",
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
        },
        LanguageConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
        },
        LanguageConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
        },
        LanguageConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
        },
        LanguageConfig {
            code: "ru",
            name: "Russian",
            native_name: "Русский",
        },
        LanguageConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
        },
        LanguageConfig {
            code: "it",
            name: "Italian",
            native_name: "Italiano",
        },
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
        },
    ]
}
