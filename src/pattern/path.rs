// Path depth normalization
//
// A pattern with N path segments is only matched against the last N
// segments of a file path, so ancestor directories never take part.

use super::Pattern;

/// Path separator understood by the pattern language
pub const SEPARATOR: char = '/';

fn segment_count(pattern: &Pattern) -> usize {
    pattern
        .as_str()
        .trim_matches(SEPARATOR)
        .split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .count()
}

/// Trim `path` to the trailing segments covered by `pattern`.
///
/// A path with fewer segments than the pattern is kept whole, as is any path
/// when the pattern has no segment text at all.
pub fn normalize(pattern: &Pattern, path: &str) -> String {
    let stripped = path.trim_matches(SEPARATOR);
    let depth = segment_count(pattern);
    if depth == 0 {
        return stripped.to_string();
    }

    let segments: Vec<&str> = stripped.split(SEPARATOR).collect();
    let start = segments.len().saturating_sub(depth);
    segments[start..].join(&SEPARATOR.to_string())
}
