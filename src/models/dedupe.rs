use std::collections::HashSet;

use super::Source;

/// Drop sources whose url was already seen, keeping the first occurrence.
///
/// Urls are compared with surrounding whitespace removed. Sources without a
/// url are never treated as duplicates of each other.
/// Order of the surviving entries is the arrival order.
pub fn dedupe_by_url(sources: Vec<Source>) -> Vec<Source> {
    let mut seen: HashSet<String> = HashSet::new();

    sources
        .into_iter()
        .filter(|source| !source.has_url() || seen.insert(source.url.trim().to_string()))
        .collect()
}
