//! Approximate matching of spoken text against a catalogue vocabulary.
//!
//! Similarity is the Ratcliff/Obershelp "gestalt" ratio `2·M / (|a| + |b|)`,
//! where `M` counts the characters covered by matching blocks found by
//! recursively taking the longest common substring. Both sides are
//! normalised first so accents, case, and spacing do not count against a
//! candidate.
//!
//! There is deliberately no minimum score: any non-empty vocabulary yields a
//! candidate, however poor the input.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::Error;

/// Fold `text` for comparison.
///
/// Applies NFKD, drops combining marks, lower-cases, and collapses runs of
/// whitespace into single spaces.
///
/// # Examples
/// ```
/// use campus_assistant::domain::term_matcher::normalise;
///
/// assert_eq!(normalise("  Programación   Web "), "programacion web");
/// ```
pub fn normalise(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity of two strings in `[0, 1]` after normalisation.
///
/// Two empty strings are identical and score `1.0`.
pub fn similarity(candidate: &str, input: &str) -> f64 {
    let a: Vec<char> = normalise(candidate).chars().collect();
    let b: Vec<char> = normalise(input).chars().collect();
    ratio(&a, &b)
}

/// Return the candidate most similar to `input`.
///
/// The original candidate value is returned, not its normalised form. When
/// several candidates share the best score the first one wins.
///
/// # Errors
/// Returns an [`Error`] with [`crate::domain::ErrorCode::NoMatch`] when
/// `candidates` is empty.
///
/// # Examples
/// ```
/// use campus_assistant::domain::term_matcher::best_match;
///
/// let subjects = ["Redes", "Internet", "Programación"];
/// assert_eq!(best_match("internt", subjects).expect("non-empty"), "Internet");
/// ```
pub fn best_match<I, S>(input: &str, candidates: I) -> Result<S, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let input: Vec<char> = normalise(input).chars().collect();
    let mut best: Option<(f64, S)> = None;

    for candidate in candidates {
        let folded: Vec<char> = normalise(candidate.as_ref()).chars().collect();
        let score = ratio(&folded, &input);
        let improves = best.as_ref().is_none_or(|(top, _)| score > *top);
        if improves {
            best = Some((score, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
        .ok_or_else(|| Error::no_match("cannot match against an empty vocabulary"))
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matched_len(a, b);
    2.0 * matched as f64 / total as f64
}

fn matched_len(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        positions.entry(*c).or_default().push(j);
    }

    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, k)` with the earliest `i`, then earliest `j`, among the
/// longest blocks.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in positions.get(c).map_or(&[][..], Vec::as_slice) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let previous = j
                .checked_sub(1)
                .and_then(|prev| run_ending_at.get(&prev))
                .copied()
                .unwrap_or(0);
            let k = previous + 1;
            next.insert(j, k);
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        run_ending_at = next;
    }
    (best_i, best_j, best_k)
}
