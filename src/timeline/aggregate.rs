use crate::model::{CommitActivity, ContributorSeries, SeriesPoint, VisualizationDocument};
use crate::util::month_key;
use std::collections::{BTreeMap, HashMap};

/// Colors handed out to contributors in rank order, wrapping around.
pub const PALETTE: [&str; 22] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD",
    "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA",
    "#F1948A", "#85C1E9", "#D7BDE2", "#A3E4D7", "#F8BBD9", "#E8DAEF",
    "#D4E6F1", "#A2D9CE", "#F9E79F", "#F5B7B1",
];

pub const DEFAULT_MIN_COMMITS: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthStats {
    pub commits: u64,
    pub lines_changed: u64,
}

/// `YYYY-MM` → author → activity that month.
pub type MonthlyStats = BTreeMap<String, BTreeMap<String, MonthStats>>;

pub fn monthly_stats(commits: &[CommitActivity]) -> MonthlyStats {
    let mut months = MonthlyStats::new();
    for commit in commits {
        let entry = months
            .entry(month_key(&commit.timestamp))
            .or_default()
            .entry(commit.author.clone())
            .or_default();
        entry.commits += 1;
        entry.lines_changed += commit.lines_changed;
    }
    months
}

/// Per-author sums across every month.
pub fn contributor_totals(monthly: &MonthlyStats) -> HashMap<&str, MonthStats> {
    let mut totals: HashMap<&str, MonthStats> = HashMap::new();
    for authors in monthly.values() {
        for (author, stats) in authors {
            let total = totals.entry(author.as_str()).or_default();
            total.commits += stats.commits;
            total.lines_changed += stats.lines_changed;
        }
    }
    totals
}

/// Builds the visualization document.
///
/// Contributors under `min_commits` are dropped, but the months they were
/// active in stay on the time axis. Survivors are ranked by total commits,
/// ties broken by name, and colored in rank order.
pub fn build_document(monthly: &MonthlyStats, min_commits: u64) -> VisualizationDocument {
    let time_points: Vec<String> = monthly.keys().cloned().collect();

    let mut ranked: Vec<(&str, MonthStats)> = contributor_totals(monthly)
        .into_iter()
        .filter(|(_, totals)| totals.commits >= min_commits)
        .collect();
    ranked.sort_by(|a, b| b.1.commits.cmp(&a.1.commits).then_with(|| a.0.cmp(b.0)));

    let contributors = ranked
        .into_iter()
        .enumerate()
        .map(|(i, (author, totals))| {
            let data = time_points
                .iter()
                .map(|month| {
                    let stats = monthly
                        .get(month)
                        .and_then(|authors| authors.get(author))
                        .copied()
                        .unwrap_or_default();
                    SeriesPoint {
                        time: month.clone(),
                        commits: stats.commits,
                        lines_changed: stats.lines_changed,
                    }
                })
                .collect();

            ContributorSeries {
                name: author.to_string(),
                color: PALETTE[i % PALETTE.len()].to_string(),
                total_commits: totals.commits,
                total_lines_changed: totals.lines_changed,
                data,
            }
        })
        .collect();

    VisualizationDocument {
        time_points,
        contributors,
    }
}
