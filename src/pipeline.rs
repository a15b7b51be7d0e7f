//! Message pipeline: decide what to do with one inbound chat message.
//!
//! The pipeline is transport-free: `telegram` converts raw updates into
//! `Inbound` values and turns the returned `Action` into API calls. New and
//! edited messages flow through identically. A failed translation degrades to
//! one localized warning reply; it never escapes as an error.

use crate::i18n::strings;
use crate::store::Preferences;
use crate::translator::Translator;
use tracing::{debug, warn};

/// What the bot should do in response to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send `text` as a threaded reply to the original message.
    Reply(String),
    /// Say nothing.
    Suppress,
    /// Send a user-facing warning as a threaded reply to the original message.
    ReportError(String),
}

/// Transport-free view of a new or edited message/caption.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub message_id: i64,
    pub chat_id: i64,
    pub is_group: bool,
    pub sender_id: Option<i64>,
    pub sender_is_bot: bool,
    pub text: String,
}

/// Run one message through filter → resolve → translate → suppress/reply.
pub async fn handle(
    inbound: &Inbound,
    prefs: &Preferences,
    translator: &dyn Translator,
) -> Action {
    let text = inbound.text.trim();

    // Eligibility filter: nothing to translate, or command text that belongs
    // to the command handler, not the translation path.
    if text.is_empty() || text.starts_with('/') {
        return Action::Suppress;
    }

    // Sender filter: bot-originated and sender-less events never translate.
    let sender_id = match inbound.sender_id {
        Some(id) if !inbound.sender_is_bot => id,
        _ => return Action::Suppress,
    };

    let target = prefs
        .resolve(sender_id, inbound.chat_id, inbound.is_group)
        .await;

    // The sole suspension point: one bounded network round trip.
    match translator.translate(text, target).await {
        Ok(translated) => {
            if is_noop(text, &translated) {
                debug!(
                    "Suppressing echo for chat {} (already in {})",
                    inbound.chat_id,
                    target.code()
                );
                Action::Suppress
            } else {
                Action::Reply(translated)
            }
        }
        Err(e) => {
            warn!(
                "Translation to {} failed for chat {}: {}",
                target.code(),
                inbound.chat_id,
                e
            );
            Action::ReportError(strings::provider_failure_notice(target).to_string())
        }
    }
}

/// A translation that equals its source (after trimming and case-folding) is
/// an echo, not a translation; replying with it would just repeat the sender.
fn is_noop(source: &str, translated: &str) -> bool {
    source.trim().to_lowercase() == translated.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::translator::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Scripted backend: returns a fixed result and counts invocations.
    #[derive(Debug)]
    struct FakeTranslator {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FakeTranslator {
        fn returning(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                result: Err(reason.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn translate(&self, _text: &str, _target: Language) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(reason) => Err(ProviderError::Unavailable(reason.clone())),
            }
        }
    }

    fn temp_prefs() -> (TempDir, Preferences) {
        let dir = TempDir::new().expect("tempdir");
        let prefs = Preferences::load(dir.path());
        (dir, prefs)
    }

    fn inbound(text: &str) -> Inbound {
        Inbound {
            message_id: 10,
            chat_id: 100,
            is_group: false,
            sender_id: Some(1),
            sender_is_bot: false,
            text: text.to_string(),
        }
    }

    // ==================== Filter Tests ====================

    #[tokio::test]
    async fn test_empty_text_is_suppressed_without_provider_call() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("anything");

        assert_eq!(handle(&inbound(""), &prefs, &translator).await, Action::Suppress);
        assert_eq!(handle(&inbound("   "), &prefs, &translator).await, Action::Suppress);
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_command_text_never_reaches_provider() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("anything");

        for text in ["/setlang en", "/getlang", "/start", " /help"] {
            let mut msg = inbound(text);
            assert_eq!(handle(&msg, &prefs, &translator).await, Action::Suppress);

            // Same for group chats.
            msg.is_group = true;
            assert_eq!(handle(&msg, &prefs, &translator).await, Action::Suppress);
        }
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bot_sender_is_suppressed() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("你好");

        let mut msg = inbound("hello");
        msg.sender_is_bot = true;
        assert_eq!(handle(&msg, &prefs, &translator).await, Action::Suppress);
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_sender_is_suppressed() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("你好");

        let mut msg = inbound("hello");
        msg.sender_id = None;
        assert_eq!(handle(&msg, &prefs, &translator).await, Action::Suppress);
        assert_eq!(translator.call_count(), 0);
    }

    // ==================== Translation Path Tests ====================

    #[tokio::test]
    async fn test_translated_text_becomes_reply() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("你好");

        let action = handle(&inbound("hello"), &prefs, &translator).await;
        assert_eq!(action, Action::Reply("你好".to_string()));
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_noop_translation_is_suppressed() {
        let (_dir, prefs) = temp_prefs();
        // Source already in the target language: backend echoes it back.
        let translator = FakeTranslator::returning("你好");

        let action = handle(&inbound("你好"), &prefs, &translator).await;
        assert_eq!(action, Action::Suppress);
    }

    #[tokio::test]
    async fn test_noop_comparison_ignores_case_and_whitespace() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::returning("  Hello World ");

        let action = handle(&inbound("hello world"), &prefs, &translator).await;
        assert_eq!(action, Action::Suppress);
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_localized_warning() {
        let (_dir, prefs) = temp_prefs();
        let translator = FakeTranslator::failing("connection refused");

        // Default target is Chinese, so the warning is in Chinese.
        let action = handle(&inbound("hello"), &prefs, &translator).await;
        assert_eq!(
            action,
            Action::ReportError(strings::provider_failure_notice(Language::CHINESE).to_string())
        );
    }

    #[tokio::test]
    async fn test_provider_failure_warning_follows_user_preference() {
        let (_dir, prefs) = temp_prefs();
        prefs.set_user_lang(1, Language::JAPANESE).await;
        let translator = FakeTranslator::failing("timeout");

        let action = handle(&inbound("hello"), &prefs, &translator).await;
        assert_eq!(
            action,
            Action::ReportError(strings::provider_failure_notice(Language::JAPANESE).to_string())
        );
    }

    // ==================== Resolution Tests ====================

    #[tokio::test]
    async fn test_group_preference_used_in_group_chats_only() {
        let (_dir, prefs) = temp_prefs();
        prefs.set_group_lang(100, Language::JAPANESE).await;
        let translator = FakeTranslator::returning("おはようございます");

        let mut msg = inbound("good morning");
        msg.is_group = true;
        let action = handle(&msg, &prefs, &translator).await;
        assert_eq!(action, Action::Reply("おはようございます".to_string()));
    }

    // ==================== is_noop Tests ====================

    #[test]
    fn test_is_noop_exact_match() {
        assert!(is_noop("hello", "hello"));
    }

    #[test]
    fn test_is_noop_case_and_whitespace_insensitive() {
        assert!(is_noop("Hello World", "  hello world "));
        assert!(is_noop("你好", " 你好 "));
    }

    #[test]
    fn test_is_noop_different_text() {
        assert!(!is_noop("hello", "你好"));
        assert!(!is_noop("hello", "hello!"));
    }
}
