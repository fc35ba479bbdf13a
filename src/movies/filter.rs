//! Filter engine: derives the matched movie list from raw state.
//!
//! Matching is a case-insensitive substring search over each item's display
//! text. It works on characters rather than bytes so highlight ranges stay
//! valid for non-ASCII titles.

use super::model::MovieItem;

/// Compute the movies matching `filter_by`.
///
/// - Empty filter: returns `all_movies` unchanged (identity passthrough).
/// - Otherwise: the stable subsequence of `all_movies` whose display text
///   contains `filter_by`, ignoring case.
///
/// Pure and total: never fails, an empty input yields an empty output.
pub fn compute_matched_movies(all_movies: &[MovieItem], filter_by: &str) -> Vec<MovieItem> {
    if filter_by.is_empty() {
        return all_movies.to_vec();
    }

    let needle: Vec<char> = filter_by.chars().collect();
    all_movies
        .iter()
        .filter(|movie| {
            let haystack: Vec<char> = movie.display_text().chars().collect();
            find_ignore_case(&haystack, &needle, 0).is_some()
        })
        .cloned()
        .collect()
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(text: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    find_ignore_case(&haystack, &needle, 0).is_some()
}

/// Character ranges of every non-overlapping match of `filter` in `text`.
///
/// Each tuple is `(start, end)` in character indices, end exclusive.
/// An empty filter produces no ranges.
pub fn highlight_ranges(text: &str, filter: &str) -> Vec<(usize, usize)> {
    if filter.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().collect();
    let needle: Vec<char> = filter.chars().collect();
    let mut ranges = Vec::new();
    let mut from = 0;

    while let Some(start) = find_ignore_case(&haystack, &needle, from) {
        let end = start + needle.len();
        ranges.push((start, end));
        from = end;
    }

    ranges
}

fn find_ignore_case(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&h, &n)| chars_eq_ignore_case(h, n))
    })
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
