use anyhow::{Context, Result};
use traductio_core::{AppConfig, Assistant};

/// Global application state
///
/// The server owns exactly one translation memory, shared by every request
/// through the [`Assistant`].
pub struct AppState {
    pub assistant: Assistant,
    /// Defaults for the page (languages, domain)
    pub config: AppConfig,
}

impl AppState {
    /// Open the translation memory and build the translator.
    ///
    /// Fails if the memory cannot be opened (e.g. another process holds it).
    pub fn new(config: AppConfig) -> Result<Self> {
        let assistant =
            Assistant::new(&config).context("Failed to initialize translation assistant")?;

        if !assistant.is_translator_available() {
            tracing::warn!(
                "No Gemini API key configured; translation requests will fail until \
                 GEMINI_API_KEY is set"
            );
        }

        Ok(Self { assistant, config })
    }
}
