use thiserror::Error;

use crate::catalog::store::SpeciesCatalog;
use crate::core::species::SpeciesEntry;
use crate::core::types::SpeciesId;
use crate::utils::validation::{validate_its_sequence, ValidationError};

/// Outcomes of an exact ITS lookup other than success
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Blank or oversized input
    #[error("Invalid sequence: {0}")]
    InvalidInput(#[from] ValidationError),

    /// No mapping for the normalized sequence
    #[error("No species matches the provided ITS sequence")]
    NotFound,

    /// The sequence maps to a species id that has no record
    #[error("ITS sequence maps to species {species_id}, which is missing from the catalog")]
    InconsistentMapping { species_id: SpeciesId },
}

/// Exact-match lookup of ITS sequences.
///
/// Input is trimmed and uppercased; beyond that a single differing base is a
/// miss. There is no fuzzy tolerance.
pub struct ItsLookup<'a> {
    catalog: &'a SpeciesCatalog,
}

impl<'a> ItsLookup<'a> {
    pub fn new(catalog: &'a SpeciesCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve a sequence to the species id in the mapping table.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidInput` for blank/oversized input or
    /// `LookupError::NotFound` when the table has no entry.
    pub fn resolve(&self, sequence: &str) -> Result<SpeciesId, LookupError> {
        let normalized = validate_its_sequence(sequence)?;
        self.catalog
            .resolve_its(&normalized)
            .ok_or(LookupError::NotFound)
    }

    /// Resolve a sequence to its species record.
    ///
    /// # Errors
    ///
    /// As [`resolve`](Self::resolve), plus `LookupError::InconsistentMapping` when
    /// the mapped id has no record. That case is a catalog integrity problem and
    /// is logged at error level.
    pub fn lookup_by_its(&self, sequence: &str) -> Result<&'a SpeciesEntry, LookupError> {
        let species_id = self.resolve(sequence)?;
        match self.catalog.get(species_id) {
            Some(entry) => Ok(entry),
            None => {
                tracing::error!(
                    species_id = %species_id,
                    "ITS mapping references a species missing from the catalog"
                );
                Err(LookupError::InconsistentMapping { species_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::SpeciesEntry;

    fn test_catalog() -> SpeciesCatalog {
        let mut catalog = SpeciesCatalog::new();
        catalog
            .add_species(
                SpeciesEntry::new(1, "Amanita muscaria").with_common_names(["Fly Agaric"]),
            )
            .unwrap();
        catalog
            .add_its_mapping("GTCGATGAAGAACGCAGCG", SpeciesId::new(1))
            .unwrap();
        catalog
            .add_its_mapping("TCCTCCGCTTATTGATATGC", SpeciesId::new(99))
            .unwrap();
        catalog
    }

    #[test]
    fn test_lookup_exact() {
        let catalog = test_catalog();
        let lookup = ItsLookup::new(&catalog);
        let entry = lookup.lookup_by_its("GTCGATGAAGAACGCAGCG").unwrap();
        assert_eq!(entry.scientific_name, "Amanita muscaria");
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        let catalog = test_catalog();
        let lookup = ItsLookup::new(&catalog);
        let messy = lookup.lookup_by_its(" gtcgatgaagaacgcagcg ").unwrap();
        let clean = lookup.lookup_by_its("GTCGATGAAGAACGCAGCG").unwrap();
        assert_eq!(messy, clean);
    }

    #[test]
    fn test_lookup_miss_is_not_found() {
        let catalog = test_catalog();
        let lookup = ItsLookup::new(&catalog);
        // One base changed
        assert_eq!(
            lookup.lookup_by_its("GTCGATGAAGAACGCAGCC"),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_lookup_invalid_input() {
        let catalog = test_catalog();
        let lookup = ItsLookup::new(&catalog);
        assert_eq!(
            lookup.lookup_by_its("   "),
            Err(LookupError::InvalidInput(ValidationError::EmptySequence))
        );
    }

    #[test]
    fn test_lookup_inconsistent_mapping() {
        let catalog = test_catalog();
        let lookup = ItsLookup::new(&catalog);
        assert_eq!(
            lookup.resolve("TCCTCCGCTTATTGATATGC"),
            Ok(SpeciesId::new(99))
        );
        assert_eq!(
            lookup.lookup_by_its("TCCTCCGCTTATTGATATGC"),
            Err(LookupError::InconsistentMapping {
                species_id: SpeciesId::new(99)
            })
        );
    }
}
