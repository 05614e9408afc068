//! Species catalog storage and indexing.
//!
//! The catalog holds the species records searched by the fuzzy matcher and the
//! ITS mapping table used for exact sequence lookup. An embedded catalog is
//! compiled into the binary, but custom catalogs can also be loaded from JSON files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use myco_search::SpeciesCatalog;
//! use myco_search::core::types::SpeciesId;
//!
//! // Load embedded catalog
//! let catalog = SpeciesCatalog::load_embedded().unwrap();
//!
//! for species in &catalog.species {
//!     println!("{} ({})", species.scientific_name, species.primary_common_name());
//! }
//!
//! let fly_agaric = catalog.get(SpeciesId::new(1));
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use myco_search::SpeciesCatalog;
//! use std::path::Path;
//!
//! let catalog = SpeciesCatalog::load_embedded().unwrap();
//! let json = catalog.to_json().unwrap();
//!
//! let custom = SpeciesCatalog::load_from_file(Path::new("my_catalog.json")).unwrap();
//! ```
//!
//! Records are validated on load: a species needs a scientific name and at
//! least one common name. ITS keys are normalized to trimmed uppercase.

pub mod store;
