mod gemini;
mod traits;

pub use gemini::GeminiTranslator;
pub use traits::{TranslationRequest, Translator, TranslatorInfo};

use crate::config::TranslatorConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a translator from configuration
pub fn create_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    Ok(Arc::new(GeminiTranslator::new(config.clone())?))
}
