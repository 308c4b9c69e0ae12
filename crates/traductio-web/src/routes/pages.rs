//! Page routes - full HTML page renders.

use axum::extract::State;
use std::sync::Arc;

use crate::state::AppState;
use crate::templates::IndexTemplate;

/// The translator page, preselected from configuration.
pub async fn index(State(state): State<Arc<AppState>>) -> IndexTemplate {
    IndexTemplate::new(
        state.config.domain,
        state.config.source_lang.to_string(),
        state.config.target_lang.to_string(),
        state.assistant.memory_count().await,
        state.assistant.is_translator_available(),
    )
}
