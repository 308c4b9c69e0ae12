use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Lang;
use crate::domain::Domain;

/// A source/translation pair remembered from an earlier request.
///
/// Field names match the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMemoryEntry {
    pub id: String,
    pub source_lang: Lang,
    pub target_lang: Lang,
    pub domain: Domain,
    /// Trimmed, case preserved
    pub source_text: String,
    /// Trimmed; replaced when the same source is submitted again
    pub translated_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub used_count: u32,
    /// Reserved for a human review step; always true today
    pub confirmed: bool,
}

impl TranslationMemoryEntry {
    /// Whether this entry occupies the uniqueness key
    /// `(source_lang, target_lang, domain, lowercase source_text)`.
    ///
    /// `source_lower` must already be trimmed and lowercased.
    pub fn has_key(
        &self,
        source_lang: &Lang,
        target_lang: &Lang,
        domain: Domain,
        source_lower: &str,
    ) -> bool {
        self.source_lang == *source_lang
            && self.target_lang == *target_lang
            && self.domain == domain
            && self.source_text.to_lowercase() == source_lower
    }

    /// Record a repeated submission of this entry's source.
    pub(crate) fn record_reuse(&mut self, translated_text: String, now: DateTime<Utc>) {
        self.used_count = self.used_count.saturating_add(1);
        self.translated_text = translated_text;
        self.updated_at = now;
    }
}
