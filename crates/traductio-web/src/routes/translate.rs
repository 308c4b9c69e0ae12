//! Translation route.

use axum::{
    extract::{Form, State},
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};
use traductio_core::{Error, Lang};

use super::TranslateForm;
use crate::helpers::{RouteResult, fragment};
use crate::state::AppState;
use crate::templates::{ErrorTemplate, TranslateResultTemplate};

const MISSING_KEY_HINT: &str =
    "Set GEMINI_API_KEY (or api_key under [translator] in config.toml) and restart the server.";

/// Translate the submitted text - returns the result panel HTML.
///
/// HTMX: Replaces `#result`, includes an OOB update of `#tm-count`.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TranslateForm>,
) -> RouteResult<Response> {
    let source_lang = Lang::new(form.source_lang.trim());
    let target_lang = Lang::new(form.target_lang.trim());

    if form.text.trim().is_empty() {
        return fragment(&ErrorTemplate::new("Enter some text to translate."), None);
    }

    debug!(
        "translate: {} chars, {} {}->{}",
        form.text.chars().count(),
        form.domain,
        source_lang,
        target_lang
    );

    match state
        .assistant
        .translate(&form.text, form.domain, &source_lang, &target_lang)
        .await
    {
        Ok(outcome) => {
            let template = TranslateResultTemplate::new(
                outcome.translated,
                outcome.matches,
                outcome.glossary_used,
                outcome.stored.as_ref(),
                state.assistant.memory_count().await,
            );
            fragment(&template, None)
        }
        Err(Error::SameLanguage(_)) => fragment(
            &ErrorTemplate::new("The selected languages are identical."),
            None,
        ),
        Err(e) if e.is_missing_credentials() => fragment(
            &ErrorTemplate::new("The translation service is not configured.")
                .with_hint(MISSING_KEY_HINT),
            None,
        ),
        Err(e) => {
            error!("Translation failed: {}", e);
            fragment(&ErrorTemplate::new(format!("Translation failed: {e}")), None)
        }
    }
}
