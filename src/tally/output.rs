use crate::model::{Report, TallyOutput, TallyRow, SCHEMA_VERSION};
use crate::util::name_width;
use anyhow::Result;
use chrono::Utc;
use console::style;

pub struct RangeMeta<'a> {
    pub repository_path: String,
    pub start: &'a str,
    pub end: &'a str,
    pub total_commits: usize,
}

/// `name : count` lines, names padded to the widest one and counts
/// right-aligned to the widest count.
pub fn format_table(rows: &[TallyRow]) -> Vec<String> {
    let width = name_width(rows.iter().map(|r| r.name.as_str()));
    let count_width = rows.iter().map(|r| r.count.to_string().len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| format!("{:<width$} : {:>count_width$}", r.name, r.count))
        .collect()
}

pub fn output_table(rows: &[TallyRow], report: Report, meta: &RangeMeta) -> Result<()> {
    if rows.is_empty() {
        eprintln!("{}", style(format!("No commits in {}..{}", meta.start, meta.end)).dim());
        return Ok(());
    }

    eprintln!(
        "{} {}",
        style(report.title()).bold(),
        style(format!("({} commits, {}..{})", meta.total_commits, meta.start, meta.end)).dim()
    );
    for line in format_table(rows) {
        println!("{line}");
    }
    Ok(())
}

pub fn output_json(rows: &[TallyRow], report: Report, meta: &RangeMeta) -> Result<()> {
    let output = TallyOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: meta.repository_path.clone(),
        report,
        start: meta.start.to_string(),
        end: meta.end.to_string(),
        total_commits: meta.total_commits,
        entries: rows.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(rows: &[TallyRow]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
