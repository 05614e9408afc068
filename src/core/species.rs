use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{SpeciesId, TermKind};

/// Reasons a species record is rejected at load time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeciesError {
    #[error("species {0} has an empty scientific name")]
    EmptyScientificName(SpeciesId),

    #[error("species {0} has no common names")]
    MissingCommonName(SpeciesId),

    #[error("species {0} has a blank common name or search term")]
    BlankTerm(SpeciesId),
}

/// A species record in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Unique identifier
    pub id: SpeciesId,

    /// Binomial name, e.g. "Amanita muscaria"
    pub scientific_name: String,

    /// Vernacular names; the first one is the display name
    pub common_names: Vec<String>,

    /// Aliases and keywords matched by fuzzy search
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SpeciesEntry {
    pub fn new(id: u32, scientific_name: impl Into<String>) -> Self {
        Self {
            id: SpeciesId::new(id),
            scientific_name: scientific_name.into(),
            common_names: Vec::new(),
            search_terms: Vec::new(),
            image_url: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_common_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns a `SpeciesError` naming the first missing or blank field.
    pub fn validate(&self) -> Result<(), SpeciesError> {
        if self.scientific_name.trim().is_empty() {
            return Err(SpeciesError::EmptyScientificName(self.id));
        }
        if self.common_names.is_empty() {
            return Err(SpeciesError::MissingCommonName(self.id));
        }
        let blank = self
            .common_names
            .iter()
            .chain(&self.search_terms)
            .any(|t| t.trim().is_empty());
        if blank {
            return Err(SpeciesError::BlankTerm(self.id));
        }
        Ok(())
    }

    /// Display name: the first common name
    #[must_use]
    pub fn primary_common_name(&self) -> &str {
        self.common_names
            .first()
            .map_or(self.scientific_name.as_str(), String::as_str)
    }

    /// All searchable terms in scan order: scientific name, common names, search terms
    pub fn terms(&self) -> impl Iterator<Item = (&str, TermKind)> {
        std::iter::once((self.scientific_name.as_str(), TermKind::Species))
            .chain(
                self.common_names
                    .iter()
                    .map(|n| (n.as_str(), TermKind::CommonName)),
            )
            .chain(
                self.search_terms
                    .iter()
                    .map(|t| (t.as_str(), TermKind::SearchTerm)),
            )
    }
}
