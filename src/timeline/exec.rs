use super::{build_document, monthly_stats, output_document, print_summary, write_document};
use crate::cli::CommonArgs;
use crate::git::{open_source, verify_range};
use anyhow::{bail, Context};
use std::path::PathBuf;

pub struct ContributorOptions {
    pub output: PathBuf,
    pub min_commits: u64,
    pub top: usize,
    pub stdout: bool,
}

pub fn exec(common: CommonArgs, start: String, end: String, opts: ContributorOptions) -> anyhow::Result<()> {
    // stdout carries the document itself in --stdout mode
    let status = |msg: String| {
        if opts.stdout {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    };

    let source = open_source(common.backend, common.repo.as_deref(), &common.git)
        .context("Failed to open git repository")?;

    verify_range(source.as_ref(), &start, &end)?;

    status(format!("Processing commits from {start} to {end}..."));

    let commits = source
        .range_activity(&start, &end)
        .context("Failed to list commits")?;

    if commits.is_empty() {
        bail!("No commits found in the specified range.");
    }
    status(format!("Found {} commits", commits.len()));

    let monthly = monthly_stats(&commits);
    status(format!("Generated statistics for {} months", monthly.len()));

    let document = build_document(&monthly, opts.min_commits);
    status(format!(
        "Included {} contributors with >= {} commits",
        document.contributors.len(),
        opts.min_commits
    ));

    if opts.stdout {
        output_document(&document)?;
    } else {
        write_document(&document, &opts.output)?;
        status(format!("Data saved to {}", opts.output.display()));
    }

    print_summary(&document, opts.top, opts.stdout);
    Ok(())
}
