use chrono::{DateTime, FixedOffset};

/// Calendar month of a timestamp in its own offset, as `YYYY-MM`.
pub fn month_key(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%Y-%m").to_string()
}

/// Parses an ISO-8601 date-time, accepting a trailing `Z` for UTC.
pub fn parse_iso8601(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    let normalized = match input.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => input.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).ok()
}

/// Module a path belongs to: the fourth path segment, or the last one for
/// paths with three segments or fewer.
///
/// `"a/b/c/d/e.scala"` maps to `"d"`, `"README.md"` to itself.
pub fn module_of(path: &str) -> &str {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.get(3).copied() {
        Some(module) => module,
        None => segments.last().copied().unwrap_or(path),
    }
}

/// Width of the widest name, in characters.
pub fn name_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
}
