//! Pagination clamps and search-term helpers shared by list endpoints.

/// Default number of projects per page on the public list.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Upper bound for a caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Clamp a 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Offset of the first row on `page` (1-based) for the given page size.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size)
}

/// Trim a raw search term; returns `None` if nothing is left to match.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Build a `%term%` ILIKE pattern, escaping `\`, `%` and `_` in the term.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
