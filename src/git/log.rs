//! Incremental parser for `git log --format=COMMIT|%H|%aN|%aI --shortstat`.

use crate::error::{Result, TallyError};
use crate::git::shortstat::parse_shortstat;
use crate::model::{CommitActivity, ShortStat};
use crate::util::parse_iso8601;
use chrono::{DateTime, FixedOffset};

pub const HEADER_PREFIX: &str = "COMMIT|";
pub const HEADER_FORMAT: &str = "--format=COMMIT|%H|%aN|%aI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
}

/// Splits a header line into hash, author and date.
///
/// The author is everything between the hash and the last `|`, so display
/// names that contain `|` are kept intact.
pub fn parse_header(line: &str) -> Result<CommitHeader> {
    let malformed = || TallyError::command_failed("git log", format!("malformed commit header '{line}'"));

    let rest = line.strip_prefix(HEADER_PREFIX).ok_or_else(malformed)?;
    let (id, rest) = rest.split_once('|').ok_or_else(malformed)?;
    let (author, date) = rest.rsplit_once('|').ok_or_else(malformed)?;

    if id.trim().is_empty() {
        return Err(malformed());
    }

    let timestamp = parse_iso8601(date).ok_or_else(|| {
        TallyError::command_failed("git log", format!("unparseable commit date '{date}'"))
    })?;

    Ok(CommitHeader {
        id: id.trim().to_string(),
        author: author.trim().to_string(),
        timestamp,
    })
}

/// Accumulates commits line by line while `git log` output is still streaming.
#[derive(Debug, Default)]
pub struct ActivityLog {
    done: Vec<CommitActivity>,
    current: Option<(CommitHeader, Option<ShortStat>)>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) -> Result<()> {
        if line.starts_with(HEADER_PREFIX) {
            let header = parse_header(line)?;
            self.flush();
            self.current = Some((header, None));
            return Ok(());
        }

        if let Some((_, stat)) = self.current.as_mut() {
            // first summary after a header belongs to that commit
            if stat.is_none() {
                *stat = parse_shortstat(line);
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Vec<CommitActivity> {
        self.flush();
        self.done
    }

    fn flush(&mut self) {
        if let Some((header, stat)) = self.current.take() {
            self.done.push(CommitActivity {
                id: header.id,
                author: header.author,
                timestamp: header.timestamp,
                lines_changed: stat.map(|s| s.lines_changed()).unwrap_or(0),
            });
        }
    }
}

/// Parses a complete `git log` listing in one go.
pub fn parse_activity_log(output: &str) -> Result<Vec<CommitActivity>> {
    let mut log = ActivityLog::new();
    for line in output.lines() {
        log.push_line(line)?;
    }
    Ok(log.finish())
}
