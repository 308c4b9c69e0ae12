//! Static terminology tables attached to domain-specific prompts.
//!
//! Tables are keyed by domain, then by an ordered language pair such as
//! `"RO-EN"`. Each term is a `source = target` line. A pair with no table of
//! its own borrows the opposite pair's table with both sides swapped.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::config::Lang;
use crate::domain::Domain;
use crate::error::{Error, Result};

const BUILTIN_GLOSSARIES: &str = include_str!("../data/glossaries.toml");

const TERM_SEPARATOR: &str = " = ";

const GLOSSARY_HEADER: &str = "--- RECOMMENDED TERMINOLOGY GLOSSARY ---";
const GLOSSARY_FOOTER: &str = "---------------------------------------";

static BUILTIN: LazyLock<Glossaries> = LazyLock::new(|| {
    Glossaries::from_toml_str(BUILTIN_GLOSSARIES).unwrap_or_else(|e| {
        warn!("Built-in glossaries unavailable: {}", e);
        Glossaries::default()
    })
});

type RawTables = HashMap<String, HashMap<String, Vec<String>>>;

/// Term lists grouped by domain and language pair
#[derive(Debug, Clone, Default)]
pub struct Glossaries {
    tables: HashMap<Domain, HashMap<String, Vec<String>>>,
}

impl Glossaries {
    /// The tables compiled into the binary
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawTables = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse glossary: {e}")))?;

        let tables = raw
            .into_iter()
            .map(|(domain, pairs)| Ok((domain.parse::<Domain>()?, pairs)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { tables })
    }

    /// Tables from `path`, or the built-in ones when no path is given.
    ///
    /// A glossary file replaces the built-in tables entirely.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let glossaries = Self::from_file(path)?;
                debug!("Loaded glossary tables from {}", path.display());
                Ok(glossaries)
            }
            None => Ok(Self::builtin().clone()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read glossary file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Terms for a translation direction, reversing the opposite pair when
    /// only that one exists.
    ///
    /// The general domain never has terms.
    pub fn terms(&self, domain: Domain, source: &Lang, target: &Lang) -> Option<Cow<'_, [String]>> {
        if domain == Domain::General {
            return None;
        }

        let table = self.tables.get(&domain)?;

        if let Some(terms) = table.get(&pair_key(source, target)) {
            return Some(Cow::Borrowed(terms.as_slice()));
        }

        table
            .get(&pair_key(target, source))
            .map(|terms| Cow::Owned(terms.iter().map(String::as_str).map(reverse_term).collect()))
    }

    /// Glossary block for a prompt, or an empty string when there is none.
    pub fn glossary_text(&self, domain: Domain, source: &Lang, target: &Lang) -> String {
        match self.terms(domain, source, target) {
            Some(terms) if !terms.is_empty() => {
                format!("\n{GLOSSARY_HEADER}\n{}\n{GLOSSARY_FOOTER}\n", terms.join("\n"))
            }
            _ => String::new(),
        }
    }
}

fn pair_key(source: &Lang, target: &Lang) -> String {
    format!("{source}-{target}")
}

/// Swap the sides of `a = b`. Terms that do not split into exactly two
/// sides are returned unchanged.
fn reverse_term(term: &str) -> String {
    let parts: Vec<&str> = term.split(TERM_SEPARATOR).collect();
    match parts.as_slice() {
        [left, right] => format!("{right}{TERM_SEPARATOR}{left}"),
        _ => term.to_string(),
    }
}
