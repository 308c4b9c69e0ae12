//! Integration tests for traductio-core
//!
//! These tests exercise the full translation workflow with a mock backend:
//! - Memory lookup before translation and recording after it
//! - Glossary and memory context handed to the backend
//! - Error propagation from the backend
//! - On-disk memory with update notifications

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use traductio_core::{
    AppConfig, Assistant, Domain, Error, Glossaries, Lang, MatchKind, MemoryConfig,
    NO_TM_MATCHES, Result,
    TranslationMemory, TranslationRequest, Translator, TranslatorConfig, UpsertOutcome,
    create_translator,
    memory::{DiskStorage, EntryStore, SequentialIds},
    translator::TranslatorInfo,
};

// =============================================================================
// Mock Translator for Testing
// =============================================================================

/// Returns predictable translations and records every request it receives.
#[derive(Default)]
struct MockTranslator {
    requests: Mutex<Vec<TranslationRequest>>,
    should_fail: bool,
}

impl MockTranslator {
    fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "mock",
        }
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if self.should_fail {
            return Err(Error::TranslationService("Mock translation failure".to_string()));
        }
        Ok(format!("[{}] {}", request.target_lang, request.text))
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

fn memory() -> TranslationMemory {
    TranslationMemory::with_store(
        EntryStore::new(DiskStorage::temporary().unwrap()),
        SequentialIds::new(),
    )
}

fn assistant_with(translator: &Arc<MockTranslator>) -> Assistant {
    Assistant::with_parts(Arc::clone(translator) as Arc<dyn Translator>, memory())
}

fn ro() -> Lang {
    Lang::new("RO")
}

fn en() -> Lang {
    Lang::new("EN")
}

// =============================================================================
// Translation Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_first_translation_is_recorded() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    let outcome = assistant
        .translate("  Diagnostic  ", Domain::Medical, &ro(), &en())
        .await
        .unwrap();

    assert_eq!(outcome.translated, "[EN] Diagnostic");
    assert!(outcome.matches.is_empty());
    assert_eq!(
        outcome.stored,
        Some(UpsertOutcome::Inserted {
            id: "tm-1".to_string()
        })
    );
    assert_eq!(assistant.memory_count().await, 1);

    let requests = translator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Diagnostic");
    assert_eq!(requests[0].tm_context, NO_TM_MATCHES);
}

#[tokio::test]
async fn test_repeat_translation_uses_memory() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    assistant
        .translate("Diagnostic", Domain::Medical, &ro(), &en())
        .await
        .unwrap();
    let second = assistant
        .translate("diagnostic", Domain::Medical, &ro(), &en())
        .await
        .unwrap();

    assert_eq!(second.matches.len(), 1);
    assert_eq!(second.matches[0].match_type, MatchKind::Exact);
    assert_eq!(second.matches[0].score, 100);
    assert_eq!(
        second.stored,
        Some(UpsertOutcome::Updated {
            id: "tm-1".to_string(),
            used_count: 2
        })
    );
    assert_eq!(assistant.memory_count().await, 1);

    let context = &translator.requests()[1].tm_context;
    assert!(context.contains("SOURCE: \"Diagnostic\""));
    assert!(context.contains("(Match: 100%, Used: 1 times)"));
}

#[tokio::test]
async fn test_partial_match_offered_as_context() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    assistant
        .translate("tensiune arteriala ridicata", Domain::Medical, &ro(), &en())
        .await
        .unwrap();
    let outcome = assistant
        .translate(
            "pacientul are tensiune arteriala ridicata de cateva zile",
            Domain::Medical,
            &ro(),
            &en(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].match_type, MatchKind::PartialSourceInQuery);
    assert_eq!(outcome.matches[0].score, 85);
    assert_eq!(assistant.memory_count().await, 2);
}

#[tokio::test]
async fn test_glossary_reaches_backend() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    let medical = assistant
        .translate("Pacientul are febră.", Domain::Medical, &ro(), &en())
        .await
        .unwrap();
    let general = assistant
        .translate("Bună ziua.", Domain::General, &ro(), &en())
        .await
        .unwrap();

    assert!(medical.glossary_used);
    assert!(!general.glossary_used);

    let requests = translator.requests();
    assert!(requests[0].glossary.contains("RECOMMENDED TERMINOLOGY GLOSSARY"));
    assert!(requests[1].glossary.is_empty());
}

#[tokio::test]
async fn test_custom_glossary_reaches_backend() {
    let translator = Arc::new(MockTranslator::default());
    let glossaries =
        Glossaries::from_toml_str("[medical]\n\"RO-EN\" = [\"febră = pyrexia\"]\n").unwrap();
    let assistant = assistant_with(&translator).with_glossaries(glossaries);

    assistant
        .translate("Pacientul are febră.", Domain::Medical, &ro(), &en())
        .await
        .unwrap();

    let glossary = &translator.requests()[0].glossary;
    assert!(glossary.contains("febră = pyrexia"));
    assert!(!glossary.contains("blood pressure"));
}

#[test]
fn test_configured_glossary_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let glossary_path = dir.path().join("terms.toml");
    std::fs::write(&glossary_path, "[juridic]\n\"RO-EN\" = [\"martor = witness\"]\n").unwrap();

    let mut config = AppConfig::default();
    config.memory.path = Some(dir.path().join("tm"));
    config.glossary_path = Some(glossary_path);

    let assistant = Assistant::new(&config).unwrap();

    assert!(
        assistant
            .glossary_text(Domain::Juridic, &en(), &ro())
            .contains("witness = martor")
    );
    assert_eq!(assistant.glossary_text(Domain::Medical, &ro(), &en()), "");
}

#[test]
fn test_unreadable_glossary_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.memory.path = Some(dir.path().join("tm"));
    config.glossary_path = Some(dir.path().join("missing.toml"));

    let err = Assistant::new(&config).err().unwrap();

    assert!(matches!(err, Error::ConfigLoad(_)));
}

#[tokio::test]
async fn test_same_language_is_rejected() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    let result = assistant.translate("text", Domain::General, &ro(), &ro()).await;

    assert!(matches!(result, Err(Error::SameLanguage(lang)) if lang == "RO"));
    assert!(translator.requests().is_empty());
}

#[tokio::test]
async fn test_blank_text_skips_backend() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    let outcome = assistant
        .translate(" \n ", Domain::General, &ro(), &en())
        .await
        .unwrap();

    assert!(outcome.translated.is_empty());
    assert!(outcome.stored.is_none());
    assert!(translator.requests().is_empty());
}

#[tokio::test]
async fn test_backend_failure_leaves_memory_untouched() {
    let translator = Arc::new(MockTranslator::failing());
    let assistant = assistant_with(&translator);

    let err = assistant
        .translate("Contract", Domain::Juridic, &ro(), &en())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Mock translation failure"));
    assert_eq!(assistant.memory_count().await, 0);
}

#[tokio::test]
async fn test_disabled_memory_is_neither_read_nor_written() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator).memory_enabled(false);

    let outcome = assistant
        .translate("Diagnostic", Domain::Medical, &ro(), &en())
        .await
        .unwrap();

    assert!(outcome.stored.is_none());
    assert_eq!(assistant.memory_count().await, 0);
}

#[tokio::test]
async fn test_missing_api_key_is_distinct() {
    let translator = create_translator(&TranslatorConfig::default()).unwrap();
    let assistant = Assistant::with_parts(translator, memory());

    let err = assistant
        .translate("Diagnostic", Domain::Medical, &ro(), &en())
        .await
        .unwrap_err();

    assert!(err.is_missing_credentials());
    assert!(!assistant.is_translator_available());
    assert_eq!(assistant.memory_count().await, 0);
}

// =============================================================================
// Memory Tests
// =============================================================================

#[tokio::test]
async fn test_on_disk_memory_notifies_subscribers() {
    let dir = tempfile::tempdir().unwrap();
    let config = MemoryConfig {
        enabled: true,
        path: Some(dir.path().join("tm")),
    };
    let translator = Arc::new(MockTranslator::default());
    let assistant = Assistant::with_parts(
        Arc::clone(&translator) as Arc<dyn Translator>,
        TranslationMemory::open(&config).unwrap(),
    );
    let mut updates = assistant.subscribe().await;

    assistant
        .translate("martor", Domain::Juridic, &ro(), &en())
        .await
        .unwrap();
    assistant.clear_memory().await;

    assert_eq!(updates.recv().await.unwrap().count, 1);
    assert_eq!(updates.recv().await.unwrap().count, 0);
    assert!(dir.path().join("tm").exists());
}

#[tokio::test]
async fn test_find_matches_without_translating() {
    let translator = Arc::new(MockTranslator::default());
    let assistant = assistant_with(&translator);

    assistant
        .translate("Rezilierea contractului se face de drept", Domain::Juridic, &ro(), &en())
        .await
        .unwrap();

    let matches = assistant
        .find_matches("rezilierea contractului", Domain::Juridic, &ro(), &en())
        .await;
    let other_direction = assistant
        .find_matches("rezilierea contractului", Domain::Juridic, &en(), &ro())
        .await;

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_type, MatchKind::PartialQueryInSource);
    assert!(other_direction.is_empty());
    assert_eq!(translator.requests().len(), 1);
}

// =============================================================================
// PDF Tests
// =============================================================================

#[test]
fn test_invalid_pdf_bytes() {
    assert!(matches!(
        traductio_core::extract_text(b"not a pdf".to_vec()),
        Err(Error::PdfOpen(_))
    ));
}

#[test]
fn test_empty_pdf_bytes() {
    assert!(traductio_core::PdfDocument::from_bytes(Vec::new()).is_err());
}
