use std::path::PathBuf;

use clap::Args;

use crate::catalog::store::SpeciesCatalog;
use crate::cli::{load_catalog, OutputFormat};
use crate::core::types::Confidence;
use crate::matching::aggregate::{HitKind, DEFAULT_RESULT_LIMIT};
use crate::matching::fuzzy::{FuzzyMatch, FuzzyMatcher, DEFAULT_THRESHOLD};
use crate::matching::{SearchAggregator, SearchConfig, SearchResults};
use crate::utils::validation::{validate_search_query, validate_threshold};

#[derive(Args)]
pub struct SearchArgs {
    /// Name, common name, alias or ITS sequence to search for
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    /// Minimum similarity (exclusive) for fuzzy name matches
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Only report the single best name match (similarity above 0.8)
    #[arg(long)]
    pub best: bool,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the query or threshold
/// is invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let query = validate_search_query(&args.query)?;
    let threshold = validate_threshold(args.threshold)?;
    let catalog = load_catalog(args.catalog.as_deref())?;

    if verbose {
        eprintln!(
            "Searching {} species for '{}' (threshold {})",
            catalog.len(),
            query,
            threshold
        );
    }

    let config = SearchConfig {
        threshold,
        result_limit: args.limit,
        ..SearchConfig::default()
    };

    if args.best {
        let best = FuzzyMatcher::new(&catalog).best_match_with(query, config.best_match_threshold);
        return print_best_match(&catalog, query, best.as_ref(), format);
    }

    let results = SearchAggregator::for_catalog(&catalog, &config).search(query, config.result_limit);

    for failure in &results.failed_sources {
        eprintln!("Warning: source '{}' failed: {}", failure.source, failure.message);
    }

    match format {
        OutputFormat::Text => print_text_results(query, &results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    Ok(())
}

fn describe_kind(kind: HitKind) -> String {
    match kind {
        HitKind::Sequence => "ITS sequence".to_string(),
        HitKind::Term(term) => term.to_string(),
        HitKind::External => "external".to_string(),
    }
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::Exact => "exact",
        Confidence::High => "high",
        Confidence::Medium => "medium",
        Confidence::Low => "low",
    }
}

fn print_text_results(query: &str, results: &SearchResults) {
    if results.hits.is_empty() {
        println!("No matches found for '{query}'");
        return;
    }

    println!("Results for '{query}' ({} found)\n", results.hits.len());
    for (i, hit) in results.hits.iter().enumerate() {
        println!("{}. {}", i + 1, hit.label);
        println!(
            "   Matched {} '{}'  Score: {:.3} ({})",
            describe_kind(hit.kind),
            truncate(&hit.matched, 40),
            hit.score,
            confidence_label(Confidence::from_score(hit.score))
        );
    }
}

fn print_tsv_results(results: &SearchResults) {
    println!("id\tlabel\tmatched\tkind\tscore\tsource");
    for hit in &results.hits {
        println!(
            "{}\t{}\t{}\t{}\t{:.4}\t{}",
            hit.id,
            hit.label,
            hit.matched,
            describe_kind(hit.kind),
            hit.score,
            hit.source
        );
    }
}

fn print_best_match(
    catalog: &SpeciesCatalog,
    query: &str,
    best: Option<&FuzzyMatch>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => match best {
            Some(m) => {
                let name = catalog
                    .get(m.species_id)
                    .map_or(m.term.as_str(), |e| e.scientific_name.as_str());
                println!("Best match for '{query}': {name}");
                println!(
                    "   Matched {} '{}'  Score: {:.3} ({})",
                    m.kind,
                    m.term,
                    m.score,
                    confidence_label(m.confidence())
                );
            }
            None => println!("No confident match for '{query}'"),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&best)?),
        OutputFormat::Tsv => {
            println!("term\ttype\tspecies_id\tscore");
            if let Some(m) = best {
                println!("{}\t{}\t{}\t{:.4}", m.term, m.kind, m.species_id, m.score);
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}
