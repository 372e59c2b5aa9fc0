use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Totals from a `git --shortstat` summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortStat {
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl ShortStat {
    pub fn lines_changed(&self) -> u64 {
        self.insertions + self.deletions
    }
}

/// One commit as seen by the monthly contributor series: who, when and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitActivity {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub lines_changed: u64,
}

/// Full per-commit detail, including the list of paths the commit touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub files: Vec<String>,
    pub lines_changed: u64,
}

impl From<CommitRecord> for CommitActivity {
    fn from(record: CommitRecord) -> Self {
        Self {
            id: record.id,
            author: record.author,
            timestamp: record.timestamp,
            lines_changed: record.lines_changed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    Authors,
    Files,
    Modules,
}

impl Report {
    pub fn title(&self) -> &'static str {
        match self {
            Report::Authors => "Commits per author",
            Report::Files => "Commits per file",
            Report::Modules => "Modules touched per author",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
    pub name: String,
    pub count: usize,
}

impl TallyRow {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self { name: name.into(), count }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub report: Report,
    pub start: String,
    pub end: String,
    pub total_commits: usize,
    pub entries: Vec<TallyRow>,
}

/// Document consumed by the contributor timeline visualization.
///
/// Every contributor's `data` has one entry per element of `time_points`,
/// in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationDocument {
    pub time_points: Vec<String>,
    pub contributors: Vec<ContributorSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSeries {
    pub name: String,
    pub color: String,
    pub total_commits: u64,
    pub total_lines_changed: u64,
    pub data: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub time: String,
    pub commits: u64,
    pub lines_changed: u64,
}
