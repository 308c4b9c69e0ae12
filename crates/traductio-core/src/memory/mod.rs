mod entry;
mod id;
pub mod matcher;
mod storage;
mod store;

pub use entry::TranslationMemoryEntry;
pub use id::{IdGenerator, SequentialIds, UuidGenerator};
pub use matcher::{MatchKind, TmMatch, find_matches};
pub use storage::{DiskStorage, MemoryStorage, StorageBackend};
pub use store::{EntryStore, MemoryUpdated, STORAGE_KEY};

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::{Lang, MemoryConfig};
use crate::domain::Domain;
use crate::error::Result;

/// What `add_translation` did with a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new entry was created
    Inserted { id: String },
    /// An existing entry was reused and its translation replaced
    Updated { id: String, used_count: u32 },
    /// Blank source or translation; nothing changed
    Skipped,
}

/// The translation memory: an in-memory collection mirrored to an
/// [`EntryStore`] after every mutation.
///
/// Persistence failures never reach the caller. They are logged and the
/// in-memory collection stays authoritative for the rest of the process.
pub struct TranslationMemory {
    entries: Vec<TranslationMemoryEntry>,
    store: EntryStore,
    ids: Box<dyn IdGenerator>,
}

impl TranslationMemory {
    /// Open the on-disk memory described by `config`.
    pub fn open(config: &MemoryConfig) -> Result<Self> {
        let storage = DiskStorage::open(config.resolved_path())?;
        Ok(Self::with_store(EntryStore::new(storage), UuidGenerator))
    }

    /// A memory that lives only in this process and never touches the disk.
    pub fn in_memory() -> Self {
        Self::with_store(EntryStore::new(MemoryStorage::default()), UuidGenerator)
    }

    /// Build a memory over an existing store, loading what it holds.
    ///
    /// A store that cannot be read or decoded yields an empty memory.
    pub fn with_store(store: EntryStore, ids: impl IdGenerator + 'static) -> Self {
        let entries = store.load().unwrap_or_else(|e| {
            warn!("Starting with an empty translation memory: {}", e);
            Vec::new()
        });

        Self {
            entries,
            store,
            ids: Box::new(ids),
        }
    }

    pub fn entries(&self) -> &[TranslationMemoryEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MemoryUpdated> {
        self.store.subscribe()
    }

    /// Up to three stored entries relevant to `query`, best first.
    pub fn find_matches(
        &self,
        query: &str,
        domain: Domain,
        source_lang: &Lang,
        target_lang: &Lang,
    ) -> Vec<TmMatch> {
        let matches = find_matches(&self.entries, query, domain, source_lang, target_lang);
        debug!(
            "Translation memory: {} match(es) for {} {}->{}",
            matches.len(),
            domain,
            source_lang,
            target_lang
        );
        matches
    }

    /// Record a translation, merging it into an existing entry when the same
    /// source (ignoring case and surrounding whitespace) was seen before.
    pub fn add_translation(
        &mut self,
        source_lang: &Lang,
        target_lang: &Lang,
        domain: Domain,
        source_text: &str,
        translated_text: &str,
    ) -> UpsertOutcome {
        let source_text = source_text.trim();
        let translated_text = translated_text.trim();
        if source_text.is_empty() || translated_text.is_empty() {
            return UpsertOutcome::Skipped;
        }

        let source_lower = source_text.to_lowercase();
        let now = Utc::now();

        let existing = self
            .entries
            .iter()
            .position(|e| e.has_key(source_lang, target_lang, domain, &source_lower));

        let outcome = if let Some(index) = existing {
            let entry = &mut self.entries[index];
            entry.record_reuse(translated_text.to_string(), now);
            UpsertOutcome::Updated {
                id: entry.id.clone(),
                used_count: entry.used_count,
            }
        } else {
            let id = self.ids.new_id();
            self.entries.push(TranslationMemoryEntry {
                id: id.clone(),
                source_lang: source_lang.clone(),
                target_lang: target_lang.clone(),
                domain,
                source_text: source_text.to_string(),
                translated_text: translated_text.to_string(),
                created_at: now,
                updated_at: now,
                used_count: 1,
                confirmed: true,
            });
            UpsertOutcome::Inserted { id }
        };

        self.persist();
        outcome
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            warn!(
                "Failed to persist translation memory ({} entries kept in memory): {}",
                self.entries.len(),
                e
            );
        }
    }
}
