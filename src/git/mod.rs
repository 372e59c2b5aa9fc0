pub mod command;
pub mod log;
pub mod repo;
pub mod shortstat;

pub use command::GitCommand;
pub use repo::GixRepo;

use crate::error::{Result, TallyError};
use crate::model::{CommitActivity, CommitRecord};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Read-only queries the aggregations need from a version-control system.
///
/// Ranges are `(start, end]`: commits reachable from `end` and not from `start`.
pub trait CommitSource {
    /// Directory the queries run against.
    fn location(&self) -> &Path;

    /// Whether `rev` names an existing commit.
    fn resolves(&self, rev: &str) -> Result<bool>;

    /// Commit ids in the range, in the backend's native listing order.
    fn rev_list(&self, start: &str, end: &str) -> Result<Vec<String>>;

    /// Author, timestamp, touched paths and line totals of one commit.
    fn commit_record(&self, id: &str) -> Result<CommitRecord>;

    /// Every commit in the range with full detail, one query per commit.
    fn range_records(&self, start: &str, end: &str) -> Result<Vec<CommitRecord>> {
        let ids = self.rev_list(start, end)?;
        tracing::info!("{} commits in {start}..{end}", ids.len());

        let pb = ProgressBar::new(ids.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("Reading commits...");

        let mut records = Vec::with_capacity(ids.len());
        for id in &ids {
            records.push(self.commit_record(id)?);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(records)
    }

    /// Author, timestamp and line totals for the whole range.
    ///
    /// Backends that can answer this with a single query should override it.
    fn range_activity(&self, start: &str, end: &str) -> Result<Vec<CommitActivity>> {
        Ok(self
            .range_records(start, end)?
            .into_iter()
            .map(CommitActivity::from)
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// Shell out to the `git` executable
    #[default]
    Git,
    /// Read the object database in-process with gitoxide
    Gix,
}

pub fn open_source(backend: Backend, repo: Option<&Path>, program: &str) -> Result<Box<dyn CommitSource>> {
    tracing::debug!("Opening repository with {backend:?} backend");
    Ok(match backend {
        Backend::Git => Box::new(GitCommand::open(program, repo)?),
        Backend::Gix => Box::new(GixRepo::open(repo)?),
    })
}

/// Checks that both ends of a range exist before anything is enumerated.
///
/// Both identifiers are always checked so the error names every bad one.
pub fn verify_range(source: &dyn CommitSource, start: &str, end: &str) -> Result<()> {
    let mut missing = Vec::new();
    for rev in [start, end] {
        if !source.resolves(rev)? {
            missing.push(rev.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(TallyError::CommitNotFound { revs: missing })
    }
}
