//! Exclusion pattern matching for the tree replicator
//!
//! Patterns are plain strings, not globs: a candidate is excluded when its
//! final path segment equals the pattern's final segment, or when the whole
//! normalized candidate ends with the normalized pattern. Both comparisons
//! are case-insensitive and both sides have `\` and `/` collapsed to `/`
//! first, so `"Logs"` matches pattern `"logs"` and `"sub/Logs"` matches
//! pattern `"SUB/logs"`.
//!
//! There is deliberately no wildcard support. Exclusion lists in practice
//! name concrete files (`appsettings.json`) or directories (`logs`), and
//! exact basename/suffix matching keeps the semantics predictable. This is a
//! known limitation, not an oversight.

/// Collapse both separator styles to `/`.
fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Final path segment of an already-normalized path.
fn basename(normalized: &str) -> &str {
    normalized.rsplit('/').next().unwrap_or(normalized)
}

/// Returns true when `candidate` matches any exclusion pattern.
///
/// Blank patterns are skipped; an empty pattern list never matches.
pub fn is_excluded(candidate: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let normalized = normalize(candidate).to_lowercase();
    for pattern in patterns {
        let p = normalize(pattern).to_lowercase();
        if p.trim().is_empty() {
            continue;
        }

        // Exact basename match
        if basename(&normalized) == basename(&p) {
            return true;
        }

        // Path-suffix match over the whole relative path
        if normalized.ends_with(&p) {
            return true;
        }
    }
    false
}
