//! Core data types for species search.
//!
//! - [`SpeciesEntry`](species::SpeciesEntry): a validated catalog record with scientific
//!   name, common names, search terms and display metadata
//! - [`SpeciesId`](types::SpeciesId): numeric species identifier shared by the catalog
//!   and the ITS mapping table
//! - [`TermKind`](types::TermKind): which field of a record a fuzzy match hit
//! - [`sequence`]: normalization of DNA/ITS input (trim + uppercase)
//!
//! Records are immutable once loaded; every search reads them concurrently
//! without locking.

pub mod sequence;
pub mod species;
pub mod types;
