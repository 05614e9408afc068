//! Sequence normalization shared by the lookup and alignment boundaries.

/// Gap symbol used in alignment strings
pub const GAP: char = '-';

/// Normalize a sequence for comparison: trim surrounding whitespace and uppercase.
///
/// # Examples
///
/// ```
/// use myco_search::core::sequence::normalize_sequence;
///
/// assert_eq!(normalize_sequence("  gtcGATg\n"), "GTCGATG");
/// ```
#[must_use]
pub fn normalize_sequence(sequence: &str) -> String {
    sequence.trim().to_uppercase()
}

/// Does the (already normalized) text look like a nucleotide sequence?
///
/// Accepts IUPAC nucleotide codes, including `U` and `N`.
#[must_use]
pub fn is_nucleotide_sequence(sequence: &str) -> bool {
    !sequence.is_empty()
        && sequence
            .chars()
            .all(|c| "ACGTURYSWKMBDHVN".contains(c.to_ascii_uppercase()))
}

/// Remove gap symbols from an alignment string
#[must_use]
pub fn ungapped(alignment: &str) -> String {
    alignment.chars().filter(|&c| c != GAP).collect()
}
