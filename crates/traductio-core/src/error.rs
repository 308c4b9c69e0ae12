use thiserror::Error;

/// Unified error type for traductio-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Translation memory persistence (opening, reading, writing, decoding)
/// - Translation operations (credentials, API requests, responses)
/// - PDF text extraction
/// - Configuration operations (loading, validation)
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Translation Memory Errors
    // ==========================================================================
    /// Failed to open the translation memory database
    #[error("failed to open translation memory: {0}")]
    StoreInit(String),

    /// Failed to read the persisted translation memory
    #[error("failed to read translation memory: {0}")]
    StoreRead(String),

    /// Persisted translation memory could not be decoded
    #[error("translation memory payload is malformed: {0}")]
    StoreCorrupt(String),

    /// Failed to persist the translation memory
    #[error("failed to write translation memory: {0}")]
    StoreWrite(String),

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// API key not configured for the translation service
    #[error("translation API key not configured")]
    TranslationMissingApiKey,

    /// The translation service answered with an error status
    #[error("translation service error: {0}")]
    TranslationService(String),

    /// Translation API request could not be sent
    #[error("translation API request failed: {0}")]
    TranslationRequest(String),

    /// Invalid response from translation API
    #[error("invalid translation API response: {0}")]
    TranslationInvalidResponse(String),

    /// Rate limited by translation API
    #[error("translation rate limited{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    TranslationRateLimited { retry_after: Option<u64> },

    /// Translation request timed out
    #[error("translation request timed out")]
    TranslationTimeout,

    /// Maximum retry attempts exceeded for translation
    #[error("translation failed after maximum retries")]
    TranslationMaxRetriesExceeded,

    /// Source and target language are identical
    #[error("source and target language are both '{0}'")]
    SameLanguage(String),

    // ==========================================================================
    // PDF Errors
    // ==========================================================================
    /// Failed to open or parse a PDF file
    #[error("failed to open PDF: {0}")]
    PdfOpen(String),

    /// Invalid page number requested
    #[error("invalid page number {page} (document has {total} pages)")]
    PdfInvalidPage { page: usize, total: usize },

    /// Failed to extract text from a PDF page
    #[error("failed to extract text from page {page}: {reason}")]
    PdfTextExtraction { page: usize, reason: String },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },
}

impl Error {
    /// Whether the caller should ask the user to configure credentials.
    pub const fn is_missing_credentials(&self) -> bool {
        matches!(self, Self::TranslationMissingApiKey)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
