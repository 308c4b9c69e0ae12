use async_trait::async_trait;

use crate::config::Lang;
use crate::domain::Domain;
use crate::error::Result;

/// Information about a translator backend
#[derive(Debug, Clone)]
pub struct TranslatorInfo {
    /// Human-readable name
    pub name: &'static str,
}

/// Everything a backend needs to translate one text.
///
/// `glossary` and `tm_context` are prompt fragments prepared by the caller;
/// either may be empty.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: Lang,
    pub target_lang: Lang,
    pub domain: Domain,
    pub glossary: String,
    pub tm_context: String,
}

/// Trait for translation backends
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get information about this translator
    fn info(&self) -> TranslatorInfo;

    /// Get the translator name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate the request's text, returning only the translation
    async fn translate(&self, request: &TranslationRequest) -> Result<String>;

    /// Check if the translator is usable (e.g., API key configured)
    fn is_available(&self) -> bool {
        true
    }
}
