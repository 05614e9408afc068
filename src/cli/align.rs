use std::path::PathBuf;

use clap::Args;

use crate::alignment::{align_checked, AlignmentResult, ScoringScheme};
use crate::cli::OutputFormat;
use crate::parsing::fasta::read_first_sequences;

/// Width of alignment blocks in text output
const LINE_WIDTH: usize = 60;

#[derive(Args)]
pub struct AlignArgs {
    /// First sequence
    #[arg(required_unless_present = "fasta")]
    pub seq1: Option<String>,

    /// Second sequence
    #[arg(required_unless_present = "fasta")]
    pub seq2: Option<String>,

    /// Read the two sequences from the first two records of a FASTA file
    #[arg(long, conflicts_with_all = ["seq1", "seq2"])]
    pub fasta: Option<PathBuf>,

    /// Score for aligned identical characters
    #[arg(long = "match", default_value_t = 1, allow_negative_numbers = true)]
    pub match_score: i32,

    /// Score for aligned differing characters
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub mismatch: i32,

    /// Score for each character aligned against a gap
    #[arg(long, default_value_t = -2, allow_negative_numbers = true)]
    pub gap: i32,
}

/// Named input pair
struct AlignInput {
    name1: String,
    seq1: String,
    name2: String,
    seq2: String,
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read or a sequence exceeds the length cap.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = resolve_input(&args)?;
    let scheme = ScoringScheme::new(args.match_score, args.mismatch, args.gap);

    if verbose {
        eprintln!(
            "Aligning {} ({} bp) against {} ({} bp) with match={} mismatch={} gap={}",
            input.name1,
            input.seq1.len(),
            input.name2,
            input.seq2.len(),
            scheme.match_score,
            scheme.mismatch,
            scheme.gap
        );
    }

    let result = align_checked(&input.seq1, &input.seq2, &scheme)?;

    match format {
        OutputFormat::Text => print_text_alignment(&input, &result),
        OutputFormat::Json => print_json_alignment(&input, &result, &scheme)?,
        OutputFormat::Tsv => print_tsv_alignment(&input, &result),
    }

    Ok(())
}

fn resolve_input(args: &AlignArgs) -> anyhow::Result<AlignInput> {
    if let Some(path) = &args.fasta {
        let mut records = read_first_sequences(path, 2)?.into_iter();
        let (Some(first), Some(second)) = (records.next(), records.next()) else {
            anyhow::bail!(
                "FASTA file {} must contain at least two sequences",
                path.display()
            );
        };
        return Ok(AlignInput {
            name1: first.name,
            seq1: first.sequence,
            name2: second.name,
            seq2: second.sequence,
        });
    }

    match (&args.seq1, &args.seq2) {
        (Some(seq1), Some(seq2)) => Ok(AlignInput {
            name1: "seq1".to_string(),
            seq1: seq1.clone(),
            name2: "seq2".to_string(),
            seq2: seq2.clone(),
        }),
        _ => anyhow::bail!("Two sequences or --fasta are required"),
    }
}

fn print_text_alignment(input: &AlignInput, result: &AlignmentResult) {
    let stats = result.stats();

    println!("Global Alignment (Needleman-Wunsch)");
    println!("{}", "=".repeat(LINE_WIDTH));
    println!("Score: {}", result.score);
    println!(
        "Length: {}  Identity: {}/{} ({:.1}%)  Mismatches: {}  Gaps: {}",
        stats.length,
        stats.matches,
        stats.length,
        stats.identity * 100.0,
        stats.mismatches,
        stats.gaps
    );

    let top: Vec<char> = result.alignment1.chars().collect();
    let marks: Vec<char> = result.match_line().chars().collect();
    let bottom: Vec<char> = result.alignment2.chars().collect();
    let label_width = input.name1.len().max(input.name2.len());

    for start in (0..top.len()).step_by(LINE_WIDTH) {
        let end = (start + LINE_WIDTH).min(top.len());
        let block = |chars: &[char]| chars[start..end].iter().collect::<String>();
        println!();
        println!("{:<label_width$}  {}", input.name1, block(&top));
        println!("{:<label_width$}  {}", "", block(&marks));
        println!("{:<label_width$}  {}", input.name2, block(&bottom));
    }
}

fn print_json_alignment(
    input: &AlignInput,
    result: &AlignmentResult,
    scheme: &ScoringScheme,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "sequence1": { "name": input.name1, "length": input.seq1.len() },
        "sequence2": { "name": input.name2, "length": input.seq2.len() },
        "scoring": scheme,
        "score": result.score,
        "alignment1": result.alignment1,
        "alignment2": result.alignment2,
        "stats": result.stats(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_alignment(input: &AlignInput, result: &AlignmentResult) {
    let stats = result.stats();
    println!("name1\tname2\tscore\tlength\tmatches\tmismatches\tgaps\tidentity\talignment1\talignment2");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{}\t{}",
        input.name1,
        input.name2,
        result.score,
        stats.length,
        stats.matches,
        stats.mismatches,
        stats.gaps,
        stats.identity,
        result.alignment1,
        result.alignment2,
    );
}
