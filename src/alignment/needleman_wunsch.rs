use serde::{Deserialize, Serialize};

use crate::core::sequence::GAP;
use crate::utils::validation::{validate_alignment_sequence, ValidationError};

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Scores for the alignment recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringScheme {
    /// Added when two aligned characters are equal
    pub match_score: i32,
    /// Added when two aligned characters differ
    pub mismatch: i32,
    /// Added for every character aligned against a gap
    pub gap: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 1,
            mismatch: -1,
            gap: -2,
        }
    }
}

impl ScoringScheme {
    #[must_use]
    pub fn new(match_score: i32, mismatch: i32, gap: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap,
        }
    }

    #[inline]
    fn substitution(&self, a: char, b: char) -> i64 {
        if a == b {
            i64::from(self.match_score)
        } else {
            i64::from(self.mismatch)
        }
    }
}

/// Optimal global alignment of two sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub score: i64,
    pub alignment1: String,
    pub alignment2: String,
}

/// Column counts for an alignment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentStats {
    /// Number of alignment columns
    pub length: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Columns where either side is a gap
    pub gaps: usize,
    /// matches / length, 0.0 for an empty alignment
    pub identity: f64,
}

impl AlignmentResult {
    /// Count matching, mismatching and gapped columns
    #[must_use]
    pub fn stats(&self) -> AlignmentStats {
        let mut matches = 0;
        let mut mismatches = 0;
        let mut gaps = 0;

        for (a, b) in self.alignment1.chars().zip(self.alignment2.chars()) {
            if a == GAP || b == GAP {
                gaps += 1;
            } else if a == b {
                matches += 1;
            } else {
                mismatches += 1;
            }
        }

        let length = matches + mismatches + gaps;
        let identity = if length == 0 {
            0.0
        } else {
            count_to_f64(matches) / count_to_f64(length)
        };

        AlignmentStats {
            length,
            matches,
            mismatches,
            gaps,
            identity,
        }
    }

    /// Marker line for display: `|` for a match, `.` for a mismatch, space for a gap
    #[must_use]
    pub fn match_line(&self) -> String {
        self.alignment1
            .chars()
            .zip(self.alignment2.chars())
            .map(|(a, b)| {
                if a == GAP || b == GAP {
                    ' '
                } else if a == b {
                    '|'
                } else {
                    '.'
                }
            })
            .collect()
    }
}

/// Global alignment of two sequences (Needleman-Wunsch).
///
/// Characters are compared exactly; callers uppercase first when case should
/// not matter. The score matrix is `(len(seq1)+1) × (len(seq2)+1)` and no size
/// limit is applied here, see [`align_checked`].
///
/// When several paths reach the optimal score the traceback prefers, in order:
/// a diagonal step, a gap in `seq2`, a gap in `seq1`. Output is deterministic.
///
/// # Examples
///
/// ```
/// use myco_search::alignment::{align, ScoringScheme};
///
/// let result = align("", "ATCG", &ScoringScheme::default());
/// assert_eq!(result.score, -8);
/// assert_eq!(result.alignment1, "----");
/// assert_eq!(result.alignment2, "ATCG");
/// ```
#[must_use]
pub fn align(seq1: &str, seq2: &str, scheme: &ScoringScheme) -> AlignmentResult {
    let s1: Vec<char> = seq1.chars().collect();
    let s2: Vec<char> = seq2.chars().collect();
    let n = s1.len();
    let m = s2.len();

    let dp = fill_matrix(&s1, &s2, scheme);
    let score = dp[n][m];

    // Traceback from (n, m); columns are collected in reverse and flipped at the end
    let mut aligned1: Vec<char> = Vec::with_capacity(n + m);
    let mut aligned2: Vec<char> = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + scheme.substitution(s1[i - 1], s2[j - 1])
        {
            aligned1.push(s1[i - 1]);
            aligned2.push(s2[j - 1]);
            i -= 1;
            j -= 1;
        } else if i > 0 && dp[i][j] == dp[i - 1][j] + i64::from(scheme.gap) {
            aligned1.push(s1[i - 1]);
            aligned2.push(GAP);
            i -= 1;
        } else {
            aligned1.push(GAP);
            aligned2.push(s2[j - 1]);
            j -= 1;
        }
    }

    AlignmentResult {
        score,
        alignment1: aligned1.into_iter().rev().collect(),
        alignment2: aligned2.into_iter().rev().collect(),
    }
}

/// Build the full score matrix
#[allow(clippy::needless_range_loop)]
fn fill_matrix(s1: &[char], s2: &[char], scheme: &ScoringScheme) -> Vec<Vec<i64>> {
    let n = s1.len();
    let m = s2.len();
    let gap = i64::from(scheme.gap);
    let mut dp = vec![vec![0i64; m + 1]; n + 1];

    for i in 0..=n {
        dp[i][0] = gap_run(i, scheme.gap);
    }
    for j in 0..=m {
        dp[0][j] = gap_run(j, scheme.gap);
    }

    for i in 1..=n {
        for j in 1..=m {
            let diagonal = dp[i - 1][j - 1] + scheme.substitution(s1[i - 1], s2[j - 1]);
            let up = dp[i - 1][j] + gap;
            let left = dp[i][j - 1] + gap;
            dp[i][j] = diagonal.max(up).max(left);
        }
    }

    dp
}

/// Score of `count` consecutive gaps.
///
/// Scores are accumulated in `i64`: with any `i32` scoring a path of up to
/// 2^32 columns cannot overflow.
#[inline]
fn gap_run(count: usize, gap: i32) -> i64 {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    count.saturating_mul(i64::from(gap))
}

/// Normalize (trim + uppercase), enforce the length cap, then align.
///
/// # Errors
///
/// Returns `ValidationError::SequenceTooLong` if either sequence exceeds
/// [`MAX_SEQUENCE_LENGTH`](crate::utils::validation::MAX_SEQUENCE_LENGTH).
pub fn align_checked(
    seq1: &str,
    seq2: &str,
    scheme: &ScoringScheme,
) -> Result<AlignmentResult, ValidationError> {
    let seq1 = validate_alignment_sequence(seq1)?;
    let seq2 = validate_alignment_sequence(seq2)?;

    tracing::debug!(
        len1 = seq1.len(),
        len2 = seq2.len(),
        "aligning sequences"
    );

    Ok(align(&seq1, &seq2, scheme))
}
