//! Askama templates for HTMX responses.
//!
//! ## HTMX Patterns Used
//!
//! - **OOB Swaps**: the translation result also updates `#tm-count` with
//!   `hx-swap-oob="true"` so the memory counter stays current
//!
//! - **SSE**: `#tm-count` is additionally refreshed from
//!   `/api/memory/events`, so clears and translations from other tabs show up
//!
//! - **Disabled Elements**: `hx-disabled-elt` prevents double submissions
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS/JS
//! - `index.html` - The translator page
//! - `partials/` - Fragments returned by the API routes

use askama::Template;
use askama_web::WebTemplate;
use traductio_core::{Domain, LanguageOption, TmMatch, UpsertOutcome, languages};

// =============================================================================
// Full Page Templates
// =============================================================================

/// The translator page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub domains: &'static [Domain],
    pub selected_domain: Domain,
    pub languages: Vec<LanguageOption>,
    pub source_lang: String,
    pub target_lang: String,
    pub memory_count: usize,
    pub api_configured: bool,
}

impl IndexTemplate {
    pub fn new(
        selected_domain: Domain,
        source_lang: String,
        target_lang: String,
        memory_count: usize,
        api_configured: bool,
    ) -> Self {
        Self {
            domains: &Domain::ALL,
            selected_domain,
            languages: languages(),
            source_lang,
            target_lang,
            memory_count,
            api_configured,
        }
    }
}

// =============================================================================
// Fragment Templates (HTMX partial responses)
// =============================================================================

/// Source textarea filled with text extracted from an uploaded PDF.
#[derive(Template, WebTemplate)]
#[template(path = "partials/extracted.html")]
pub struct ExtractedTemplate {
    pub text: String,
    pub page_count: usize,
    pub file_name: String,
}

/// Translation output with the memory segments that informed it.
#[derive(Template, WebTemplate)]
#[template(path = "partials/translate_result.html")]
pub struct TranslateResultTemplate {
    pub translated: String,
    pub matches: Vec<TmMatch>,
    pub glossary_used: bool,
    pub memory_note: Option<&'static str>,
    pub memory_count: usize,
}

impl TranslateResultTemplate {
    pub fn new(
        translated: String,
        matches: Vec<TmMatch>,
        glossary_used: bool,
        stored: Option<&UpsertOutcome>,
        memory_count: usize,
    ) -> Self {
        let memory_note = stored.and_then(|outcome| match outcome {
            UpsertOutcome::Inserted { .. } => Some("Saved to translation memory"),
            UpsertOutcome::Updated { .. } => Some("Translation memory entry updated"),
            UpsertOutcome::Skipped => None,
        });

        Self {
            translated,
            matches,
            glossary_used,
            memory_note,
            memory_count,
        }
    }
}

/// Translation memory entry count.
///
/// `oob` renders it as an out-of-band swap for inclusion in other fragments.
#[derive(Template, WebTemplate)]
#[template(path = "partials/memory_stats.html")]
pub struct MemoryStatsTemplate {
    pub count: usize,
    pub oob: bool,
}

/// Error shown in place of a result.
#[derive(Template, WebTemplate)]
#[template(path = "partials/error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub hint: Option<&'static str>,
}

impl ErrorTemplate {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    #[must_use]
    pub const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}
