//! # myco-search
//!
//! The search core of a mycology data portal: identify fungal species from
//! user-supplied names or ITS sequences, and align DNA sequences.
//!
//! Users rarely type a scientific name exactly. A query might be a common name
//! ("chanterelle"), a misspelling ("Amanita muscria") or a raw ITS barcode
//! copied from a sequencing report. `myco-search` answers all three against a
//! catalog of known species.
//!
//! ## Features
//!
//! - **Exact ITS lookup**: case- and whitespace-insensitive sequence → species
//! - **Fuzzy name matching**: Levenshtein similarity over scientific names,
//!   common names and aliases
//! - **Search aggregation**: merges several result sources, de-duplicated and
//!   tolerant of a failing source
//! - **Global alignment**: Needleman-Wunsch with configurable scoring
//!
//! ## Example
//!
//! ```rust,no_run
//! use myco_search::{align, ItsLookup, ScoringScheme, SpeciesCatalog};
//! use myco_search::matching::FuzzyMatcher;
//!
//! // Load the embedded catalog of known species
//! let catalog = SpeciesCatalog::load_embedded().unwrap();
//!
//! // Exact lookup from an ITS sequence
//! let species = ItsLookup::new(&catalog).lookup_by_its("gtcgatgaagaacgcagcg").unwrap();
//! println!("{}", species.scientific_name);
//!
//! // Fuzzy name suggestions
//! for m in FuzzyMatcher::new(&catalog).find_similar_terms("porcino", 0.6) {
//!     println!("{}: {:.2}", m.term, m.score);
//! }
//!
//! // Align two sequences
//! let result = align("GATTACA", "GCATGCU", &ScoringScheme::default());
//! println!("{}\n{}", result.alignment1, result.alignment2);
//! ```
//!
//! ## Modules
//!
//! - [`alignment`]: Needleman-Wunsch global alignment
//! - [`catalog`]: Species catalog storage and ITS mapping table
//! - [`core`]: Core data types for species and sequences
//! - [`matching`]: Fuzzy matching, exact lookup and search aggregation
//! - [`parsing`]: FASTA input for the aligner
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: JSON HTTP API

pub mod alignment;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::alignment::{align, align_checked, AlignmentResult, ScoringScheme};
pub use crate::catalog::store::SpeciesCatalog;
pub use crate::core::species::SpeciesEntry;
pub use crate::core::types::*;
pub use crate::matching::levenshtein::{levenshtein, similarity};
pub use crate::matching::{FuzzyMatcher, ItsLookup, SearchAggregator};
