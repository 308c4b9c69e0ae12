use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::Domain;

/// Language code as supplied by the caller (e.g. "RO", "ES", "EN").
///
/// Codes are free-form and compared verbatim; nothing is validated against a
/// fixed list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn default_source_lang() -> Lang {
    Lang::new(DEFAULT_SOURCE_LANG)
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Translator backend configuration for the Gemini `generateContent` API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl TranslatorConfig {
    /// Create a new translator config with default generation settings
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            api_key,
            model: model.into(),
            ..Self::default()
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

// Low temperature keeps technical terminology stable between runs
const fn default_temperature() -> f32 {
    0.1
}

const fn default_top_k() -> u32 {
    32
}

const fn default_top_p() -> f32 {
    1.0
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Translation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Look up and record translations in the translation memory
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Database directory (defaults to $XDG_DATA_HOME/traductio)
    pub path: Option<PathBuf>,
}

const fn default_true() -> bool {
    true
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl MemoryConfig {
    /// Resolved database directory
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::util::translation_memory_path)
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default source language
    #[serde(default = "default_source_lang")]
    pub source_lang: Lang,

    /// Default target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Default domain
    #[serde(default)]
    pub domain: Domain,

    /// Translator backend configuration
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Translation memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Glossary tables replacing the built-in ones
    pub glossary_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            domain: Domain::default(),
            translator: TranslatorConfig::default(),
            memory: MemoryConfig::default(),
            glossary_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, crate::error::Error> {
        toml::from_str(content).map_err(|e| {
            crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}"))
        })
    }

    /// Load from default locations (~/.config/traductio/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("traductio").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

/// A language option for UI dropdowns
#[derive(Debug, Clone)]
pub struct LanguageOption {
    /// Language code as stored in the translation memory (e.g., "RO")
    pub code: &'static str,
    /// Display name (e.g., "Romanian")
    pub name: &'static str,
    /// Flag emoji
    pub flag: &'static str,
}

/// Languages offered by the front ends.
///
/// The first three have glossary tables; the rest are translated without one.
pub fn languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption { code: "RO", name: "Romanian", flag: "🇷🇴" },
        LanguageOption { code: "ES", name: "Spanish", flag: "🇪🇸" },
        LanguageOption { code: "EN", name: "English", flag: "🇬🇧" },
        LanguageOption { code: "FR", name: "French", flag: "🇫🇷" },
        LanguageOption { code: "DE", name: "German", flag: "🇩🇪" },
        LanguageOption { code: "IT", name: "Italian", flag: "🇮🇹" },
    ]
}

/// Default source language code
pub const DEFAULT_SOURCE_LANG: &str = "RO";
/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "ES";
/// Default Gemini endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Human-readable name for a language code, used in prompts.
///
/// Unknown codes are passed through so the model still sees something usable.
pub fn language_name(code: &str) -> &str {
    languages()
        .into_iter()
        .find(|opt| opt.code.eq_ignore_ascii_case(code))
        .map_or(code, |opt| opt.name)
}
