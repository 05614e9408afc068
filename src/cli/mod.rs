//! Command-line interface for myco-search.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **align**: Globally align two sequences (Needleman-Wunsch)
//! - **lookup**: Identify a species from an exact ITS sequence
//! - **search**: Fuzzy search species names, with ITS lookup for sequence queries
//! - **catalog**: List, show, or export species from the catalog
//! - **serve**: Start the JSON HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Align two sequences
//! myco-search align GATTACA GCATGCU
//!
//! # Align the first two records of a FASTA file, JSON output
//! myco-search align --fasta its.fa --format json
//!
//! # Exact ITS lookup
//! myco-search lookup GTCGATGAAGAACGCAGCG
//!
//! # Fuzzy name search
//! myco-search search chantrelle
//!
//! # Start the API
//! myco-search serve --port 8080
//! ```

use clap::{Parser, Subcommand};

pub mod align;
pub mod catalog;
pub mod lookup;
pub mod search;

#[derive(Parser)]
#[command(name = "myco-search")]
#[command(version)]
#[command(about = "Search fungal species by name or ITS sequence and align sequences")]
#[command(
    long_about = "myco-search is the search core of a mycology data portal.\n\nIt provides:\n- Exact species identification from ITS sequences\n- Fuzzy matching of scientific names, common names and aliases\n- Global pairwise sequence alignment (Needleman-Wunsch)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Globally align two sequences
    Align(align::AlignArgs),

    /// Look up a species by exact ITS sequence
    Lookup(lookup::LookupArgs),

    /// Search species by name
    Search(search::SearchArgs),

    /// Inspect the species catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<std::path::PathBuf>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a custom catalog if a path was given, otherwise the embedded one
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub fn load_catalog(
    path: Option<&std::path::Path>,
) -> anyhow::Result<crate::catalog::store::SpeciesCatalog> {
    use crate::catalog::store::SpeciesCatalog;

    let catalog = match path {
        Some(path) => SpeciesCatalog::load_from_file(path)?,
        None => SpeciesCatalog::load_embedded()?,
    };
    tracing::debug!(
        species = catalog.len(),
        its_mappings = catalog.its_mapping_count(),
        "loaded catalog"
    );
    Ok(catalog)
}
