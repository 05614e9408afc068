//! Species search: approximate name matching and exact sequence lookup.
//!
//! - [`levenshtein`]: edit distance and normalized similarity
//! - [`FuzzyMatcher`](fuzzy::FuzzyMatcher): ranks catalog terms similar to a query
//! - [`ItsLookup`](lookup::ItsLookup): exact ITS sequence → species lookup
//! - [`SearchAggregator`](aggregate::SearchAggregator): merges several sources,
//!   de-duplicated, tolerant of individual source failures
//!
//! ## Fuzzy Matching
//!
//! Similarity is `1 - levenshtein(lower(a), lower(b)) / max(len(a), len(b))`.
//! Every scientific name, common name and search term in the catalog is scored;
//! terms scoring strictly above the threshold (default 0.6) are returned,
//! highest first.
//!
//! ## Example
//!
//! ```rust,no_run
//! use myco_search::SpeciesCatalog;
//! use myco_search::matching::{FuzzyMatcher, SearchAggregator, SearchConfig};
//!
//! let catalog = SpeciesCatalog::load_embedded().unwrap();
//!
//! let matcher = FuzzyMatcher::new(&catalog);
//! for m in matcher.find_similar_terms("chantrelle", 0.6) {
//!     println!("{} ({}): {:.2}", m.term, m.kind, m.score);
//! }
//!
//! let aggregator = SearchAggregator::for_catalog(&catalog, &SearchConfig::default());
//! let results = aggregator.search("porcini", 10);
//! ```

pub mod aggregate;
pub mod fuzzy;
pub mod levenshtein;
pub mod lookup;

pub use aggregate::{SearchAggregator, SearchConfig, SearchHit, SearchResults, SearchSource};
pub use fuzzy::{FuzzyMatch, FuzzyMatcher};
pub use lookup::{ItsLookup, LookupError};
