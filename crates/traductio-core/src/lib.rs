//! Traductio Core Library
//!
//! Domain-aware translation assistant:
//! - Translation memory with containment-based matching and upsert
//! - Built-in legal and medical terminology glossaries
//! - Translation via the Gemini API
//! - PDF text extraction

pub mod config;
pub mod domain;
pub mod error;
pub mod glossary;
pub mod memory;
pub mod pdf;
pub mod prompt;
pub mod translator;
pub mod util;

pub use config::{
    AppConfig, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG, Lang, LanguageOption, MemoryConfig,
    TranslatorConfig, language_name, languages,
};
pub use domain::Domain;
pub use error::{Error, Result};
pub use glossary::Glossaries;
pub use memory::{
    MatchKind, MemoryUpdated, TmMatch, TranslationMemory, TranslationMemoryEntry, UpsertOutcome,
};
pub use pdf::{PdfDocument, extract_text, join_pages};
pub use prompt::{NO_TM_MATCHES, format_for_prompt};
pub use translator::{GeminiTranslator, TranslationRequest, Translator, create_translator};

use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

/// High-level assistant combining the translation memory, glossaries and a
/// translation backend.
///
/// Cloning is cheap and clones share the same memory.
#[derive(Clone)]
pub struct Assistant {
    translator: Arc<dyn Translator>,
    memory: Arc<RwLock<TranslationMemory>>,
    glossaries: Arc<Glossaries>,
    memory_enabled: bool,
}

/// Result of one translation
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// The translated text
    pub translated: String,
    /// Memory entries offered to the model as context, best first
    pub matches: Vec<TmMatch>,
    /// Whether a terminology glossary was part of the prompt
    pub glossary_used: bool,
    /// What the memory did with the new pair (`None` when memory is off)
    pub stored: Option<UpsertOutcome>,
}

impl Assistant {
    /// Create an assistant from configuration, opening the on-disk memory
    /// and the configured glossary file, if any.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let translator = create_translator(&config.translator)?;
        let glossaries = Glossaries::load(config.glossary_path.as_deref())?;
        let memory = TranslationMemory::open(&config.memory)?;
        Ok(Self::with_parts(translator, memory)
            .with_glossaries(glossaries)
            .memory_enabled(config.memory.enabled))
    }

    /// Create with a custom translator and memory
    pub fn with_parts(translator: Arc<dyn Translator>, memory: TranslationMemory) -> Self {
        Self {
            translator,
            memory: Arc::new(RwLock::new(memory)),
            glossaries: Arc::new(Glossaries::builtin().clone()),
            memory_enabled: true,
        }
    }

    /// Replace the built-in glossaries
    #[must_use]
    pub fn with_glossaries(mut self, glossaries: Glossaries) -> Self {
        self.glossaries = Arc::new(glossaries);
        self
    }

    /// Turn memory lookup and recording on or off
    #[must_use]
    pub const fn memory_enabled(mut self, enabled: bool) -> Self {
        self.memory_enabled = enabled;
        self
    }

    /// Translate `text`, using stored translations and the domain glossary
    /// as context, then record the result in the memory.
    pub async fn translate(
        &self,
        text: &str,
        domain: Domain,
        source_lang: &Lang,
        target_lang: &Lang,
    ) -> Result<TranslationOutcome> {
        if source_lang == target_lang {
            return Err(Error::SameLanguage(source_lang.to_string()));
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(TranslationOutcome {
                translated: String::new(),
                matches: Vec::new(),
                glossary_used: false,
                stored: None,
            });
        }

        let matches = if self.memory_enabled {
            self.memory
                .read()
                .await
                .find_matches(text, domain, source_lang, target_lang)
        } else {
            Vec::new()
        };

        let glossary = self.glossaries.glossary_text(domain, source_lang, target_lang);
        let request = TranslationRequest {
            text: text.to_string(),
            source_lang: source_lang.clone(),
            target_lang: target_lang.clone(),
            domain,
            glossary,
            tm_context: format_for_prompt(&matches),
        };

        info!(
            "Translating {} chars ({} {}->{}) with {}, {} memory match(es)",
            text.chars().count(),
            domain,
            source_lang,
            target_lang,
            self.translator.name(),
            matches.len()
        );

        let translated = self.translator.translate(&request).await?;

        let stored = if self.memory_enabled {
            let outcome = self.memory.write().await.add_translation(
                source_lang,
                target_lang,
                domain,
                text,
                &translated,
            );
            debug!("Translation memory: {:?}", outcome);
            Some(outcome)
        } else {
            None
        };

        Ok(TranslationOutcome {
            translated,
            matches,
            glossary_used: !request.glossary.is_empty(),
            stored,
        })
    }

    /// Ranked memory matches for `query` without translating.
    pub async fn find_matches(
        &self,
        query: &str,
        domain: Domain,
        source_lang: &Lang,
        target_lang: &Lang,
    ) -> Vec<TmMatch> {
        self.memory
            .read()
            .await
            .find_matches(query, domain, source_lang, target_lang)
    }

    /// Glossary block used for a direction, or an empty string.
    pub fn glossary_text(&self, domain: Domain, source_lang: &Lang, target_lang: &Lang) -> String {
        self.glossaries.glossary_text(domain, source_lang, target_lang)
    }

    pub async fn memory_count(&self) -> usize {
        self.memory.read().await.count()
    }

    pub async fn clear_memory(&self) {
        self.memory.write().await.clear();
    }

    /// Receive a [`MemoryUpdated`] after every persisted change.
    pub async fn subscribe(&self) -> broadcast::Receiver<MemoryUpdated> {
        self.memory.read().await.subscribe()
    }

    pub fn is_translator_available(&self) -> bool {
        self.translator.is_available()
    }
}
