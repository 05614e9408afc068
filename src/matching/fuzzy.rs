use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::store::SpeciesCatalog;
use crate::core::types::{Confidence, SpeciesId, TermKind};
use crate::matching::levenshtein::similarity;
use crate::utils::validation::{validate_query, validate_threshold, ValidationError};

/// Default similarity threshold for suggestions
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Threshold used by [`FuzzyMatcher::best_match`]
pub const BEST_MATCH_THRESHOLD: f64 = 0.8;

/// A catalog term similar to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyMatch {
    /// The catalog term as written in the record
    pub term: String,

    /// Similarity in `(threshold, 1]`
    pub score: f64,

    /// Which field of the record matched
    #[serde(rename = "type")]
    pub kind: TermKind,

    pub species_id: SpeciesId,
}

impl FuzzyMatch {
    #[must_use]
    pub fn confidence(&self) -> Confidence {
        Confidence::from_score(self.score)
    }
}

/// Scans every term of every catalog record for names similar to a query
pub struct FuzzyMatcher<'a> {
    catalog: &'a SpeciesCatalog,
}

impl<'a> FuzzyMatcher<'a> {
    pub fn new(catalog: &'a SpeciesCatalog) -> Self {
        Self { catalog }
    }

    /// Terms whose similarity to `query` is strictly greater than `threshold`,
    /// highest score first.
    ///
    /// One result per matching (term, species) pair. When the same term
    /// (ignoring case) matches the same species twice, only the higher-ranked
    /// occurrence is kept. A species can still appear more than once through
    /// different terms.
    #[must_use]
    pub fn find_similar_terms(&self, query: &str, threshold: f64) -> Vec<FuzzyMatch> {
        let mut matches: Vec<FuzzyMatch> = Vec::new();

        for entry in &self.catalog.species {
            for (term, kind) in entry.terms() {
                let score = similarity(query, term);
                if score > threshold {
                    matches.push(FuzzyMatch {
                        term: term.to_string(),
                        score,
                        kind,
                        species_id: entry.id,
                    });
                }
            }
        }

        // Stable sort: equal scores keep scan order
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut seen: HashSet<(String, SpeciesId)> = HashSet::new();
        matches.retain(|m| seen.insert((m.term.to_lowercase(), m.species_id)));

        tracing::debug!(
            query,
            threshold,
            matches = matches.len(),
            "fuzzy term search"
        );

        matches
    }

    /// Top match above [`BEST_MATCH_THRESHOLD`], if any
    #[must_use]
    pub fn best_match(&self, query: &str) -> Option<FuzzyMatch> {
        self.best_match_with(query, BEST_MATCH_THRESHOLD)
    }

    /// Top match strictly above `threshold`, if any
    #[must_use]
    pub fn best_match_with(&self, query: &str, threshold: f64) -> Option<FuzzyMatch> {
        self.find_similar_terms(query, threshold).into_iter().next()
    }

    /// Validating entry point for untrusted input: trims the query and enforces
    /// the query length cap and threshold range before scanning.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for an empty or oversized query, or a
    /// threshold outside `[0, 1]`.
    pub fn search(&self, query: &str, threshold: f64) -> Result<Vec<FuzzyMatch>, ValidationError> {
        let query = validate_query(query)?;
        let threshold = validate_threshold(threshold)?;
        Ok(self.find_similar_terms(query, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::SpeciesEntry;

    fn catalog_of(entries: Vec<SpeciesEntry>) -> SpeciesCatalog {
        let mut catalog = SpeciesCatalog::new();
        for entry in entries {
            catalog.add_species(entry).unwrap();
        }
        catalog
    }

    fn morel_catalog() -> SpeciesCatalog {
        catalog_of(vec![
            SpeciesEntry::new(4, "Morchella esculenta")
                .with_common_names(["Morel"])
                .with_search_terms(["morels"]),
            SpeciesEntry::new(3, "Boletus edulis")
                .with_common_names(["Porcini"])
                .with_search_terms(["porcini", "cep"]),
        ])
    }

    #[test]
    fn test_ranking_descending() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);
        let results = matcher.find_similar_terms("morel", DEFAULT_THRESHOLD);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].term, "Morel");
        assert_eq!(results[0].kind, TermKind::CommonName);
        assert!((results[0].score - 1.0).abs() < f64::EPSILON);
        assert_eq!(results[1].term, "morels");
        assert_eq!(results[1].kind, TermKind::SearchTerm);
        assert!(results[0].score > results[1].score);
        assert!(results.iter().all(|m| m.species_id == SpeciesId::new(4)));
    }

    #[test]
    fn test_threshold_is_strict() {
        let catalog = catalog_of(vec![
            SpeciesEntry::new(1, "Xylaria hypoxylon").with_common_names(["abcd"])
        ]);
        let matcher = FuzzyMatcher::new(&catalog);

        // similarity("abcx", "abcd") == 1 - 1/4 == 0.75 exactly
        assert!((similarity("abcx", "abcd") - 0.75).abs() < f64::EPSILON);
        assert!(matcher.find_similar_terms("abcx", 0.75).is_empty());

        let results = matcher.find_similar_terms("abcx", 0.74);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "abcd");
    }

    #[test]
    fn test_dedup_same_term_same_species() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);
        let results = matcher.find_similar_terms("PORCINI", DEFAULT_THRESHOLD);

        // "Porcini" (common name) and "porcini" (search term) collapse to one
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].term, "Porcini");
        assert_eq!(results[0].kind, TermKind::CommonName);
    }

    #[test]
    fn test_same_term_different_species_kept() {
        let catalog = catalog_of(vec![
            SpeciesEntry::new(1, "Amanita muscaria").with_common_names(["Toadstool"]),
            SpeciesEntry::new(2, "Amanita pantherina").with_common_names(["Toadstool"]),
        ]);
        let matcher = FuzzyMatcher::new(&catalog);
        let results = matcher.find_similar_terms("toadstool", DEFAULT_THRESHOLD);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].species_id, SpeciesId::new(1));
        assert_eq!(results[1].species_id, SpeciesId::new(2));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = SpeciesCatalog::new();
        let matcher = FuzzyMatcher::new(&catalog);
        assert!(matcher.find_similar_terms("morel", 0.0).is_empty());
    }

    #[test]
    fn test_empty_query() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);
        assert!(matcher.find_similar_terms("", DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_best_match() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);

        let best = matcher.best_match("Boletus eduls").unwrap();
        assert_eq!(best.term, "Boletus edulis");
        assert_eq!(best.kind, TermKind::Species);

        // similarity("porcino", "Porcini") ~= 0.857
        assert!(matcher.best_match("porcino").is_some());

        // similarity("morl", "Morel") == 0.8 exactly, not above the best-match cut
        assert!(!matcher.find_similar_terms("morl", DEFAULT_THRESHOLD).is_empty());
        assert!(matcher.best_match("morl").is_none());
    }

    #[test]
    fn test_best_match_with_custom_threshold() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);

        let loose = matcher.best_match_with("morl", 0.7).unwrap();
        assert_eq!(loose.term, "Morel");
        assert_eq!(loose.confidence(), Confidence::Medium);

        assert!(matcher.best_match_with("porcino", 0.9).is_none());
    }

    #[test]
    fn test_search_validates_input() {
        let catalog = morel_catalog();
        let matcher = FuzzyMatcher::new(&catalog);

        assert_eq!(matcher.search("   ", 0.6), Err(ValidationError::EmptyQuery));
        assert!(matches!(
            matcher.search("morel", 2.0),
            Err(ValidationError::InvalidThreshold(_))
        ));
        let results = matcher.search("  morel  ", 0.6).unwrap();
        assert_eq!(results[0].term, "Morel");
    }

    #[test]
    fn test_serialized_shape() {
        let m = FuzzyMatch {
            term: "Morel".to_string(),
            score: 1.0,
            kind: TermKind::CommonName,
            species_id: SpeciesId::new(4),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["type"], "common_name");
        assert_eq!(json["species_id"], 4);
        assert_eq!(json["term"], "Morel");
    }
}
