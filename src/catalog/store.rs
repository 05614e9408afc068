use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

use crate::core::sequence::normalize_sequence;
use crate::core::species::{SpeciesEntry, SpeciesError};
use crate::core::types::SpeciesId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid species record: {0}")]
    InvalidEntry(#[from] SpeciesError),

    #[error("Duplicate species id {0}")]
    DuplicateId(SpeciesId),

    #[error("Empty ITS sequence key mapped to species {0}")]
    EmptyItsKey(SpeciesId),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub species: Vec<SpeciesEntry>,
    /// Normalized ITS sequence -> species id
    #[serde(default)]
    pub its_mappings: BTreeMap<String, SpeciesId>,
}

/// The species catalog with its lookup indexes.
///
/// Read-only after loading; shared between concurrent searches by reference.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    /// All species records, in load order
    pub species: Vec<SpeciesEntry>,

    /// Index: species ID -> index in species vec
    id_to_index: HashMap<SpeciesId, usize>,

    /// Index: normalized ITS sequence -> species ID
    its_to_species: HashMap<String, SpeciesId>,
}

impl SpeciesCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            species: Vec::new(),
            id_to_index: HashMap::new(),
            its_to_species: HashMap::new(),
        }
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON fails validation.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Embedded at compile time, validated by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/fungi.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, an invalid species record, a duplicate
    /// id, or a blank ITS key.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION,
                data.version
            );
        }

        let mut catalog = Self::new();
        for entry in data.species {
            catalog.add_species(entry)?;
        }

        for (sequence, species_id) in data.its_mappings {
            catalog.add_its_mapping(&sequence, species_id)?;
            if catalog.get(species_id).is_none() {
                tracing::warn!(
                    "ITS mapping {} points to unknown species {}",
                    sequence,
                    species_id
                );
            }
        }

        Ok(catalog)
    }

    /// Add a species record after validating it
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidEntry` if required fields are missing, or
    /// `CatalogError::DuplicateId` if the id is already present.
    pub fn add_species(&mut self, entry: SpeciesEntry) -> Result<(), CatalogError> {
        entry.validate()?;
        if self.id_to_index.contains_key(&entry.id) {
            return Err(CatalogError::DuplicateId(entry.id));
        }

        self.id_to_index.insert(entry.id, self.species.len());
        self.species.push(entry);
        Ok(())
    }

    /// Map an ITS sequence to a species. The key is normalized first.
    ///
    /// The species does not have to exist yet; a dangling mapping surfaces as an
    /// inconsistent lookup rather than a load failure.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyItsKey` if the sequence is blank.
    pub fn add_its_mapping(
        &mut self,
        sequence: &str,
        species_id: SpeciesId,
    ) -> Result<(), CatalogError> {
        let key = normalize_sequence(sequence);
        if key.is_empty() {
            return Err(CatalogError::EmptyItsKey(species_id));
        }
        self.its_to_species.insert(key, species_id);
        Ok(())
    }

    /// Get a species by ID
    #[must_use]
    pub fn get(&self, id: SpeciesId) -> Option<&SpeciesEntry> {
        self.id_to_index.get(&id).map(|&idx| &self.species[idx])
    }

    /// Resolve an already-normalized ITS sequence to its mapped species id
    #[must_use]
    pub fn resolve_its(&self, normalized: &str) -> Option<SpeciesId> {
        self.its_to_species.get(normalized).copied()
    }

    /// Number of ITS mappings
    #[must_use]
    pub fn its_mapping_count(&self) -> usize {
        self.its_to_species.len()
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            species: self.species.clone(),
            its_mappings: self
                .its_to_species
                .iter()
                .map(|(seq, id)| (seq.clone(), *id))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of species in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::new()
    }
}
