//! Pairwise global sequence alignment.
//!
//! [`align`] implements Needleman-Wunsch with a linear gap penalty over any
//! alphabet. It fills the complete `(n+1) × (m+1)` score matrix and traces back
//! one optimal path:
//!
//! ```text
//! dp[i][0] = i * gap            dp[0][j] = j * gap
//! dp[i][j] = max(dp[i-1][j-1] + s(a_i, b_j),
//!                dp[i-1][j]   + gap,
//!                dp[i][j-1]   + gap)
//! ```
//!
//! Ties in the traceback resolve diagonal first, then a gap in the second
//! sequence, then a gap in the first, so equal inputs always produce identical
//! alignment strings.
//!
//! ## Example
//!
//! ```rust
//! use myco_search::alignment::{align_checked, ScoringScheme};
//!
//! let result = align_checked("gattaca", "GCATGCU", &ScoringScheme::default()).unwrap();
//! assert_eq!(result.score, -1);
//! assert_eq!(result.alignment1.len(), result.alignment2.len());
//! ```

pub mod needleman_wunsch;

pub use needleman_wunsch::{align, align_checked, AlignmentResult, AlignmentStats, ScoringScheme};
