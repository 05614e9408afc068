use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_catalog, OutputFormat};
use crate::core::species::SpeciesEntry;
use crate::matching::lookup::{ItsLookup, LookupError};

#[derive(Args)]
pub struct LookupArgs {
    /// ITS sequence (case and surrounding whitespace are ignored)
    #[arg(required = true)]
    pub sequence: String,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute lookup subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the sequence is invalid,
/// or no species matches it.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: LookupArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;

    if verbose {
        eprintln!(
            "Looking up {} bp sequence among {} ITS mappings",
            args.sequence.trim().len(),
            catalog.its_mapping_count()
        );
    }

    let entry = match ItsLookup::new(&catalog).lookup_by_its(&args.sequence) {
        Ok(entry) => entry,
        Err(LookupError::NotFound) => {
            anyhow::bail!("No species matches the provided ITS sequence");
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Text => print_text_entry(entry),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
        OutputFormat::Tsv => {
            println!("id\tscientific_name\tcommon_name");
            println!(
                "{}\t{}\t{}",
                entry.id,
                entry.scientific_name,
                entry.primary_common_name()
            );
        }
    }

    Ok(())
}

/// Human-readable species record, shared with `catalog show`
pub(crate) fn print_text_entry(entry: &SpeciesEntry) {
    println!("Species: {}\n", entry.scientific_name);
    println!("ID:           {}", entry.id);
    println!("Common names: {}", entry.common_names.join(", "));

    if !entry.search_terms.is_empty() {
        println!("Also known:   {}", entry.search_terms.join(", "));
    }

    if let Some(url) = &entry.image_url {
        println!("Image:        {url}");
    }

    if let Some(desc) = &entry.description {
        println!("\nDescription: {desc}");
    }
}
