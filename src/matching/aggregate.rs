use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::catalog::store::SpeciesCatalog;
use crate::core::sequence::{is_nucleotide_sequence, normalize_sequence};
use crate::core::types::{SpeciesId, TermKind};
use crate::matching::fuzzy::{FuzzyMatcher, BEST_MATCH_THRESHOLD, DEFAULT_THRESHOLD};
use crate::matching::lookup::{ItsLookup, LookupError};
use crate::utils::validation::{clamp_result_limit, validate_query, ValidationError};

/// Default number of results returned by a search
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Configuration for searches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Similarity threshold for fuzzy suggestions
    pub threshold: f64,
    /// Threshold for the single best match
    pub best_match_threshold: f64,
    /// Maximum number of merged results
    pub result_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            best_match_threshold: BEST_MATCH_THRESHOLD,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// How a hit was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// Exact ITS sequence match
    Sequence,
    /// Fuzzy match on a name or search term
    Term(TermKind),
    /// Anything contributed by a non-catalog source
    External,
}

/// One search result, from any source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identifier used for de-duplication across sources, e.g. `species:3`
    pub id: String,

    /// Text to display
    pub label: String,

    /// Matched term or sequence
    pub matched: String,

    pub kind: HitKind,

    /// Relevance in `[0, 1]`
    pub score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_id: Option<SpeciesId>,

    /// Name of the source that produced the hit
    pub source: String,
}

/// Identifier of a catalog species hit
#[must_use]
pub fn species_hit_id(id: SpeciesId) -> String {
    format!("species:{id}")
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),

    #[error("data integrity problem: {0}")]
    Integrity(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// A provider of search hits.
///
/// Implementations must be safe to call from concurrent requests.
pub trait SearchSource: Send + Sync {
    /// Short name used in results and logs
    fn name(&self) -> &str;

    /// Hits for `query`, best first. `limit` is a hint.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the source cannot answer. The aggregator
    /// skips failed sources.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SourceError>;
}

/// Fuzzy name search over the catalog
pub struct CatalogSource<'a> {
    catalog: &'a SpeciesCatalog,
    threshold: f64,
}

impl<'a> CatalogSource<'a> {
    pub fn new(catalog: &'a SpeciesCatalog, threshold: f64) -> Self {
        Self { catalog, threshold }
    }
}

impl SearchSource for CatalogSource<'_> {
    fn name(&self) -> &str {
        "catalog"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SourceError> {
        // Sequences and overlong text are the ITS source's business, not a failure here
        let Ok(query) = validate_query(query) else {
            return Ok(Vec::new());
        };

        let matcher = FuzzyMatcher::new(self.catalog);
        let mut seen: HashSet<SpeciesId> = HashSet::new();
        let hits = matcher
            .search(query, self.threshold)?
            .into_iter()
            // Best term per species, so one species with many aliases cannot fill the limit
            .filter(|m| seen.insert(m.species_id))
            .take(limit)
            .map(|m| {
                let label = self
                    .catalog
                    .get(m.species_id)
                    .map_or_else(|| m.term.clone(), |e| {
                        format!("{} ({})", e.scientific_name, e.primary_common_name())
                    });
                SearchHit {
                    id: species_hit_id(m.species_id),
                    label,
                    matched: m.term,
                    kind: HitKind::Term(m.kind),
                    score: m.score,
                    species_id: Some(m.species_id),
                    source: self.name().to_string(),
                }
            })
            .collect();
        Ok(hits)
    }
}

/// Exact ITS lookup for queries that look like nucleotide sequences
pub struct ItsSource<'a> {
    catalog: &'a SpeciesCatalog,
}

impl<'a> ItsSource<'a> {
    pub fn new(catalog: &'a SpeciesCatalog) -> Self {
        Self { catalog }
    }
}

impl SearchSource for ItsSource<'_> {
    fn name(&self) -> &str {
        "its"
    }

    fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchHit>, SourceError> {
        let normalized = normalize_sequence(query);
        if !is_nucleotide_sequence(&normalized) {
            return Ok(Vec::new());
        }

        match ItsLookup::new(self.catalog).lookup_by_its(&normalized) {
            Ok(entry) => Ok(vec![SearchHit {
                id: species_hit_id(entry.id),
                label: format!(
                    "{} ({})",
                    entry.scientific_name,
                    entry.primary_common_name()
                ),
                matched: normalized,
                kind: HitKind::Sequence,
                score: 1.0,
                species_id: Some(entry.id),
                source: self.name().to_string(),
            }]),
            Err(LookupError::NotFound | LookupError::InvalidInput(_)) => Ok(Vec::new()),
            Err(e @ LookupError::InconsistentMapping { .. }) => {
                Err(SourceError::Integrity(e.to_string()))
            }
        }
    }
}

/// A source that failed during an aggregated search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

/// Merged output of all sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<SourceFailure>,
}

/// Queries every source in registration order and merges the hits.
///
/// Hits are de-duplicated by id (first occurrence wins) and truncated to the
/// limit. A failing source contributes nothing; the rest still answer.
#[derive(Default)]
pub struct SearchAggregator<'a> {
    sources: Vec<Box<dyn SearchSource + 'a>>,
}

impl<'a> SearchAggregator<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// The standard catalog-backed aggregator: exact ITS lookup, then fuzzy names
    #[must_use]
    pub fn for_catalog(catalog: &'a SpeciesCatalog, config: &SearchConfig) -> Self {
        Self::new()
            .with_source(ItsSource::new(catalog))
            .with_source(CatalogSource::new(catalog, config.threshold))
    }

    /// Register a source; earlier sources take precedence in de-duplication
    #[must_use]
    pub fn with_source(mut self, source: impl SearchSource + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of registered sources
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> SearchResults {
        let limit = clamp_result_limit(limit);
        let mut seen: HashSet<String> = HashSet::new();
        let mut results = SearchResults::default();

        for source in &self.sources {
            match source.search(query, limit) {
                Ok(hits) => {
                    for hit in hits {
                        if seen.insert(hit.id.clone()) {
                            results.hits.push(hit);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "search source failed");
                    results.failed_sources.push(SourceFailure {
                        source: source.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        results.hits.truncate(limit);
        results
    }
}
