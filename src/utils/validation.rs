//! Centralized input validation and limits.
//!
//! The DP algorithms run in O(n·m) time and space with no early exit, so every
//! boundary (HTTP handler, CLI, search source) checks input size here before
//! calling into them.

use crate::core::sequence::{is_nucleotide_sequence, normalize_sequence};

/// Maximum length of each sequence passed to the aligner (DOS protection).
///
/// Two sequences at the cap allocate a ~4M cell score matrix.
pub const MAX_SEQUENCE_LENGTH: usize = 2_000;

/// Maximum length of a sequence accepted by the ITS lookup
pub const MAX_ITS_SEQUENCE_LENGTH: usize = 2_000;

/// Maximum length of a fuzzy search query, in characters
pub const MAX_QUERY_LENGTH: usize = 200;

/// Upper bound on the number of search results returned
pub const MAX_RESULT_LIMIT: usize = 50;

/// Security validation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Sequence is empty")]
    EmptySequence,
    #[error("Sequence too long: {length} characters exceeds maximum of {max}")]
    SequenceTooLong { length: usize, max: usize },
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("Search query too long: exceeds {MAX_QUERY_LENGTH} characters")]
    QueryTooLong,
    #[error("Threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f64),
}

/// Check a sequence against a length cap, counting characters.
///
/// # Errors
///
/// Returns `ValidationError::SequenceTooLong` if the sequence exceeds `max`.
pub fn check_sequence_length(sequence: &str, max: usize) -> Result<(), ValidationError> {
    let length = sequence.chars().count();
    if length > max {
        return Err(ValidationError::SequenceTooLong { length, max });
    }
    Ok(())
}

/// Normalize and validate a sequence for the aligner.
///
/// Empty sequences are allowed: aligning against nothing is well defined.
///
/// # Errors
///
/// Returns `ValidationError::SequenceTooLong` if the normalized sequence exceeds
/// [`MAX_SEQUENCE_LENGTH`].
pub fn validate_alignment_sequence(sequence: &str) -> Result<String, ValidationError> {
    let normalized = normalize_sequence(sequence);
    check_sequence_length(&normalized, MAX_SEQUENCE_LENGTH)?;
    Ok(normalized)
}

/// Normalize and validate a sequence for ITS lookup.
///
/// # Errors
///
/// Returns `ValidationError::EmptySequence` if nothing remains after trimming,
/// or `ValidationError::SequenceTooLong` if it exceeds [`MAX_ITS_SEQUENCE_LENGTH`].
pub fn validate_its_sequence(sequence: &str) -> Result<String, ValidationError> {
    let normalized = normalize_sequence(sequence);
    if normalized.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    check_sequence_length(&normalized, MAX_ITS_SEQUENCE_LENGTH)?;
    Ok(normalized)
}

/// Validate a fuzzy search query, returning it trimmed.
///
/// # Errors
///
/// Returns `ValidationError::EmptyQuery` for blank input or
/// `ValidationError::QueryTooLong` past [`MAX_QUERY_LENGTH`] characters.
pub fn validate_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(ValidationError::QueryTooLong);
    }
    Ok(trimmed)
}

/// Validate a query for the merged search, returning it trimmed.
///
/// Text that looks like a nucleotide sequence may run to
/// [`MAX_ITS_SEQUENCE_LENGTH`] so whole ITS regions can be pasted; anything
/// else is held to the fuzzy query cap.
///
/// # Errors
///
/// Returns `ValidationError::EmptyQuery` for blank input,
/// `ValidationError::SequenceTooLong` for an oversized sequence, or
/// `ValidationError::QueryTooLong` for oversized text.
pub fn validate_search_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if is_nucleotide_sequence(&trimmed.to_uppercase()) {
        check_sequence_length(trimmed, MAX_ITS_SEQUENCE_LENGTH)?;
        return Ok(trimmed);
    }
    validate_query(trimmed)
}

/// Validate a similarity threshold.
///
/// # Errors
///
/// Returns `ValidationError::InvalidThreshold` unless `0.0 <= threshold <= 1.0`.
pub fn validate_threshold(threshold: f64) -> Result<f64, ValidationError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ValidationError::InvalidThreshold(threshold))
    }
}

/// Clamp a requested result limit into `1..=MAX_RESULT_LIMIT`
#[must_use]
pub fn clamp_result_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_RESULT_LIMIT)
}
