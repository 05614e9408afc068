//! Parsers for sequence input files.
//!
//! - **FASTA** (plain or gzip/bgzip): named sequences fed to the aligner
//!
//! ## Example
//!
//! ```rust,no_run
//! use myco_search::parsing::fasta::read_sequences;
//! use std::path::Path;
//!
//! let records = read_sequences(Path::new("its_regions.fa")).unwrap();
//! for record in &records {
//!     println!("{}: {} bp", record.name, record.sequence.len());
//! }
//! ```

use thiserror::Error;

pub mod fasta;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Too many records: {0} exceeds maximum allowed (10000)")]
    TooManyRecords(usize),

    #[error("Sequence '{name}' is too long ({length} bases)")]
    SequenceTooLong { name: String, length: usize },
}
