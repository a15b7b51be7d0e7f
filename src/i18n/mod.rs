//! Language support: the fixed supported-language table, the validated
//! `Language` type, and localized user-facing strings.
//!
//! - `registry`: single source of truth for supported languages and the
//!   global default target
//! - `language`: validated `Language` value type
//! - `strings`: localized notices and command replies

mod language;
mod registry;
pub mod strings;

pub use language::Language;
pub use registry::{normalize, LanguageConfig, LanguageRegistry, DEFAULT_TARGET_LANG};
