//! Edit distance and normalized similarity.
//!
//! Both functions are O(len(a)·len(b)) in time and space and intended for short
//! strings such as species names. Callers cap input length first.

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Minimum number of single-character insertions, deletions or substitutions
/// turning `a` into `b`. Case-sensitive; compares Unicode scalar values.
///
/// # Examples
///
/// ```
/// use myco_search::matching::levenshtein::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "morel"), 5);
/// ```
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // matrix[j][i]: distance between b[..j] and a[..i]
    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, cell) in matrix[0].iter_mut().enumerate() {
        *cell = i;
    }
    for (j, row) in matrix.iter_mut().enumerate() {
        row[0] = j;
    }

    for j in 1..=b.len() {
        for i in 1..=a.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let deletion = matrix[j][i - 1] + 1;
            let insertion = matrix[j - 1][i] + 1;
            let substitution = matrix[j - 1][i - 1] + cost;
            matrix[j][i] = deletion.min(insertion).min(substitution);
        }
    }

    matrix[b.len()][a.len()]
}

/// Case-insensitive similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical (1.0).
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    1.0 - count_to_f64(levenshtein(&a, &b)) / count_to_f64(longest)
}
