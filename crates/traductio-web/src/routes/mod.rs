//! HTTP route handlers for the translation assistant.
//!
//! Every route returns HTML: the index page, or fragments for HTMX to swap
//! in. User-facing failures render an error fragment with status 200 so HTMX
//! still swaps it; only malformed requests get error statuses.

mod extract;
mod memory;
mod pages;
mod translate;

pub use extract::extract_pdf;
pub use memory::{clear_memory, memory_events, memory_stats};
pub use pages::index;
pub use translate::translate;

use serde::Deserialize as SerdeDeserialize;
use traductio_core::Domain;

/// Form data for translation.
#[derive(SerdeDeserialize, Default)]
pub struct TranslateForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub domain: Domain,
    pub source_lang: String,
    pub target_lang: String,
}
