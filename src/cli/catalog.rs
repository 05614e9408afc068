use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::lookup::print_text_entry;
use crate::cli::{load_catalog, OutputFormat};
use crate::core::types::SpeciesId;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all species in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show details of a specific species
    Show {
        /// Species ID
        #[arg(required = true)]
        id: SpeciesId,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the species is not
/// found, or the export cannot be written.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog } => run_list(catalog, format, verbose),
        CatalogCommands::Show { id, catalog } => run_show(id, catalog, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
    }
}

fn run_list(
    catalog_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} species and {} ITS mappings",
            catalog.len(),
            catalog.its_mapping_count()
        );
    }

    match format {
        OutputFormat::Text => {
            let name_width = catalog
                .species
                .iter()
                .map(|s| s.scientific_name.len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Species Catalog ({} species)\n", catalog.len());
            println!("{:>4} {:<name_w$} Common Name", "ID", "Name", name_w = name_width);
            println!("{}", "-".repeat(name_width + 30));

            for entry in &catalog.species {
                println!(
                    "{:>4} {:<name_w$} {}",
                    entry.id.0,
                    entry.scientific_name,
                    entry.primary_common_name(),
                    name_w = name_width
                );
                if verbose && !entry.search_terms.is_empty() {
                    println!("     └─ Also known: {}", entry.search_terms.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = catalog
                .species
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "scientific_name": s.scientific_name,
                        "common_name": s.primary_common_name(),
                        "common_name_count": s.common_names.len(),
                        "search_term_count": s.search_terms.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tscientific_name\tcommon_name\tsearch_terms");
            for s in &catalog.species {
                println!(
                    "{}\t{}\t{}\t{}",
                    s.id,
                    s.scientific_name,
                    s.primary_common_name(),
                    s.search_terms.join(",")
                );
            }
        }
    }

    Ok(())
}

fn run_show(
    id: SpeciesId,
    catalog_path: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let entry = catalog
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("Species '{}' not found", id))?;

    match format {
        OutputFormat::Text => print_text_entry(entry),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(entry)?),
        OutputFormat::Tsv => {
            println!("field\tvalue");
            println!("id\t{}", entry.id);
            println!("scientific_name\t{}", entry.scientific_name);
            for name in &entry.common_names {
                println!("common_name\t{name}");
            }
            for term in &entry.search_terms {
                println!("search_term\t{term}");
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!(
        "Exported {} species to {}",
        catalog.len(),
        output.display()
    );

    Ok(())
}
