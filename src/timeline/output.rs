use crate::model::VisualizationDocument;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Serializes the whole document first, then writes the file in one go.
pub fn write_document(document: &VisualizationDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn output_document(document: &VisualizationDocument) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

pub fn format_summary(document: &VisualizationDocument, top: usize) -> Vec<String> {
    document
        .contributors
        .iter()
        .take(top)
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{:>2}. {:<25} : {:>4} commits, {:>8} lines",
                i + 1,
                c.name,
                c.total_commits,
                c.total_lines_changed
            )
        })
        .collect()
}

pub fn print_summary(document: &VisualizationDocument, top: usize, to_stderr: bool) {
    let heading = format!("\n{}", style(format!("Top {top} contributors:")).bold());
    let lines = format_summary(document, top);
    if to_stderr {
        eprintln!("{heading}");
        lines.iter().for_each(|l| eprintln!("{l}"));
    } else {
        println!("{heading}");
        lines.iter().for_each(|l| println!("{l}"));
    }
}
