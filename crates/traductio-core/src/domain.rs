use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Subject domain of a translation.
///
/// Selects both the system instruction given to the translation service and
/// the glossary table attached to the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    General,
    #[serde(alias = "legal")]
    Juridic,
    Medical,
}

impl Domain {
    pub const ALL: [Self; 3] = [Self::General, Self::Juridic, Self::Medical];

    /// Tag used in persisted entries and glossary tables
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Juridic => "juridic",
            Self::Medical => "medical",
        }
    }

    /// Human-readable label for UI controls
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Juridic => "Legal",
            Self::Medical => "Medical",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Self::General),
            "juridic" | "legal" => Ok(Self::Juridic),
            "medical" => Ok(Self::Medical),
            other => Err(Error::ConfigInvalid {
                field: "domain".to_string(),
                reason: format!("unknown domain '{other}' (expected general, juridic or medical)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parses_aliases() {
        assert_eq!("legal".parse::<Domain>().ok(), Some(Domain::Juridic));
        assert_eq!(" Medical ".parse::<Domain>().ok(), Some(Domain::Medical));
        assert!("finance".parse::<Domain>().is_err());
    }

    #[test]
    fn test_domain_serializes_as_tag() {
        let json = serde_json::to_string(&Domain::Juridic).unwrap();
        assert_eq!(json, "\"juridic\"");
        let parsed: Domain = serde_json::from_str("\"legal\"").unwrap();
        assert_eq!(parsed, Domain::Juridic);
    }
}
