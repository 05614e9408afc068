use serde::{Deserialize, Serialize};

/// Unique identifier for a species in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SpeciesId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// Role a term plays in a species record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    /// The scientific (binomial) name
    Species,
    /// A vernacular name
    CommonName,
    /// An alias or search keyword
    SearchTerm,
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Species => write!(f, "species"),
            Self::CommonName => write!(f, "common_name"),
            Self::SearchTerm => write!(f, "search_term"),
        }
    }
}

/// Qualitative strength of a fuzzy match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
    Exact,
}

impl Confidence {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            Self::Exact
        } else if score >= 0.9 {
            Self::High
        } else if score >= 0.75 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
