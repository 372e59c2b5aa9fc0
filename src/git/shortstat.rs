//! Parsing of git's `--shortstat` summary line, e.g.
//! ` 5 files changed, 123 insertions(+), 45 deletions(-)`.
//!
//! Nothing else in the crate looks at this format.

use crate::model::ShortStat;

/// Returns `true` when `line` has the shape of a shortstat summary.
pub fn is_shortstat_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.as_bytes()[0].is_ascii_digit()
        && (trimmed.contains(" changed")
            || trimmed.contains("insertion")
            || trimmed.contains("deletion"))
}

/// Parses a shortstat summary line.
///
/// Returns `None` when the line is not a summary at all. Parts whose count
/// cannot be read are counted as zero.
pub fn parse_shortstat(line: &str) -> Option<ShortStat> {
    if !is_shortstat_line(line) {
        return None;
    }

    let mut stat = ShortStat::default();
    for part in line.split(',') {
        let part = part.trim();
        let count = leading_count(part);
        if count.is_none() {
            tracing::warn!("Unreadable shortstat segment '{part}', counting it as zero");
        }
        let count = count.unwrap_or(0);

        if part.contains("insertion") {
            stat.insertions += count;
        } else if part.contains("deletion") {
            stat.deletions += count;
        } else if part.contains("changed") {
            stat.files_changed += count;
        }
    }

    Some(stat)
}

fn leading_count(part: &str) -> Option<u64> {
    part.split_whitespace().next()?.parse().ok()
}
