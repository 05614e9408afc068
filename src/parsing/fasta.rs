//! Reader for FASTA files using noodles.
//!
//! Supplies sequences to the aligner. Files ending in `.gz` or `.bgz` are
//! decompressed, anything else is read as plain text.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;

use crate::parsing::ParseError;
use crate::utils::validation::{check_sequence_length, MAX_SEQUENCE_LENGTH};

/// Maximum number of records read from one file (DOS protection)
pub const MAX_FASTA_RECORDS: usize = 10_000;

/// A named sequence read from FASTA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub sequence: String,
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read every record of a FASTA file.
///
/// Records are parsed one at a time. noodles reads a whole record into memory
/// before its length is checked, so an oversized record is allocated once and
/// then rejected without being kept.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::Noodles` if
/// parsing fails, `ParseError::InvalidFormat` if no records are found,
/// `ParseError::TooManyRecords` past [`MAX_FASTA_RECORDS`], or
/// `ParseError::SequenceTooLong` for a record over the length cap.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    read_first_sequences(path, usize::MAX)
}

/// Read at most `limit` records from the start of a FASTA file.
///
/// Parsing stops once `limit` records are in hand; the rest of the file is
/// never read.
///
/// # Errors
///
/// Same as [`read_sequences`], for the records actually read.
pub fn read_first_sequences(path: &Path, limit: usize) -> Result<Vec<SequenceRecord>, ParseError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(MultiGzDecoder::new(file));
        read_from(&mut fasta::io::Reader::new(reader), limit)
    } else {
        let reader = BufReader::new(file);
        read_from(&mut fasta::io::Reader::new(reader), limit)
    }
}

/// Parse FASTA records from in-memory text
///
/// # Errors
///
/// Same as [`read_sequences`], minus I/O failures.
pub fn parse_fasta_text(text: &str) -> Result<Vec<SequenceRecord>, ParseError> {
    read_from(&mut fasta::io::Reader::new(text.as_bytes()), usize::MAX)
}

/// Parse from a noodles FASTA reader
fn read_from<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
    limit: usize,
) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records().take(limit) {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if records.len() >= MAX_FASTA_RECORDS {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).to_uppercase();

        check_sequence_length(&sequence, MAX_SEQUENCE_LENGTH).map_err(|_| {
            ParseError::SequenceTooLong {
                name: name.clone(),
                length: sequence.len(),
            }
        })?;

        records.push(SequenceRecord { name, sequence });
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(records)
}
