//! Localized user-facing strings.
//!
//! Translation-failure notices are localized to the resolved target language
//! of the message that failed, so the warning reads naturally to the person
//! who would have received the translation. Command replies stay in English;
//! commands are an explicit opt-in surface and the codes themselves are the
//! vocabulary.

use crate::i18n::{Language, LanguageRegistry};

/// Help text for /start and /help.
pub const HELP_TEXT: &str = "I translate every message I see into your preferred language.\n\n\
Commands:\n\
/setlang <code> - set your personal target language\n\
/getlang - show the language your messages are translated into\n\
/setdefaultlang <code> - set this group's default language (admins only)\n\
/help - show this message\n\n\
Language codes: zh, en, ja, ko, es, fr, de, ru, pt, it, ar, hi";

/// Terse warning sent as a threaded reply when the translation backend fails,
/// localized to the target language the message would have been translated into.
pub fn provider_failure_notice(target: Language) -> &'static str {
    match target.code() {
        "zh" => "⚠️ 翻译服务暂时不可用，请稍后再试。",
        "ja" => "⚠️ 翻訳サービスは一時的に利用できません。後でもう一度お試しください。",
        "ko" => "⚠️ 번역 서비스를 일시적으로 사용할 수 없습니다. 나중에 다시 시도해 주세요.",
        "es" => "⚠️ El servicio de traducción no está disponible temporalmente. Inténtalo más tarde.",
        "fr" => "⚠️ Le service de traduction est temporairement indisponible. Réessayez plus tard.",
        "de" => "⚠️ Der Übersetzungsdienst ist vorübergehend nicht verfügbar. Bitte später erneut versuchen.",
        "ru" => "⚠️ Сервис перевода временно недоступен. Повторите попытку позже.",
        "pt" => "⚠️ O serviço de tradução está temporariamente indisponível. Tente novamente mais tarde.",
        "it" => "⚠️ Il servizio di traduzione è temporaneamente non disponibile. Riprova più tardi.",
        "ar" => "⚠️ خدمة الترجمة غير متاحة مؤقتًا. يرجى المحاولة لاحقًا.",
        "hi" => "⚠️ अनुवाद सेवा अस्थायी रूप से अनुपलब्ध है। कृपया बाद में पुनः प्रयास करें।",
        _ => "⚠️ Translation is temporarily unavailable. Please try again later.",
    }
}

/// Reply for /setlang or /setdefaultlang with a code outside the supported set.
pub fn invalid_language_reply(code: &str) -> String {
    let supported = LanguageRegistry::get()
        .list()
        .iter()
        .map(|lang| lang.code)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Unsupported language code: {}\nSupported codes: {}",
        code.trim(),
        supported
    )
}

/// Confirmation after a successful /setlang.
pub fn user_lang_changed_reply(lang: Language) -> String {
    format!(
        "✅ Your messages will now be translated into {} ({}).",
        lang.name(),
        lang.native_name()
    )
}

/// Confirmation after a successful /setdefaultlang.
pub fn group_lang_changed_reply(lang: Language) -> String {
    format!(
        "✅ This group's default translation language is now {} ({}).",
        lang.name(),
        lang.native_name()
    )
}

/// Reply for /getlang describing the effective target language.
pub fn current_lang_reply(lang: Language, source: &str) -> String {
    format!(
        "Your messages are translated into {} ({}), based on {}.",
        lang.name(),
        lang.native_name(),
        source
    )
}

/// Reply when a non-admin invokes /setdefaultlang.
pub const PERMISSION_DENIED_REPLY: &str =
    "⛔ Only the group owner or an administrator can change the group's default language.";

/// Reply when /setdefaultlang is used outside a group chat.
pub const GROUP_ONLY_REPLY: &str = "/setdefaultlang only works in group chats.";

/// Usage hint when /setlang is invoked without an argument.
pub const SETLANG_USAGE_REPLY: &str = "Usage: /setlang <code>\nExample: /setlang en";

/// Usage hint when /setdefaultlang is invoked without an argument.
pub const SETDEFAULTLANG_USAGE_REPLY: &str =
    "Usage: /setdefaultlang <code>\nExample: /setdefaultlang ja";
