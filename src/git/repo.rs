use crate::error::{Result, TallyError};
use crate::git::CommitSource;
use crate::model::CommitRecord;
use chrono::{DateTime, FixedOffset};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use similar::{ChangeTag, TextDiff};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// [`CommitSource`] reading the object database in-process.
pub struct GixRepo {
    repo: Repository,
    mailmap: gix::mailmap::Snapshot,
    path: PathBuf,
}

impl GixRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        let mailmap = repo.open_mailmap();

        Ok(Self { repo, mailmap, path })
    }

    fn peel_to_commit(&self, rev: &str) -> Option<ObjectId> {
        let spec = format!("{rev}^{{commit}}");
        let id = self.repo.rev_parse_single(spec.as_str()).ok()?;
        let commit = id.object().ok()?.try_into_commit().ok()?;
        Some(commit.id)
    }

    fn require_commit(&self, rev: &str) -> Result<ObjectId> {
        self.peel_to_commit(rev)
            .ok_or_else(|| TallyError::CommitNotFound { revs: vec![rev.to_string()] })
    }

    /// Commits reachable from `tip`, `tip` included, stopping at anything in `hidden`.
    /// Paired with committer time, the key `git rev-list` orders by.
    fn ancestors(&self, tip: ObjectId, hidden: &HashSet<ObjectId>) -> Result<Vec<(ObjectId, i64)>> {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = vec![tip];
        let mut found = Vec::new();

        while let Some(commit_id) = stack.pop() {
            if hidden.contains(&commit_id) || !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            found.push((commit_id, secs));

            for pid in commit.parent_ids() {
                stack.push(pid.into());
            }
        }

        Ok(found)
    }

    /// Paths and changed lines against the parent (or the empty tree). Merges report
    /// nothing, like `git diff-tree` and `git log --shortstat` without `-m`.
    fn changed_paths(&self, commit_id: ObjectId) -> Result<(Vec<String>, u64)> {
        let commit = self.repo.find_commit(commit_id)?;
        if commit.parent_ids().count() > 1 {
            tracing::debug!("{commit_id} is a merge, no changes counted");
            return Ok((Vec::new(), 0));
        }
        let commit_tree = commit.tree()?;
        let first_parent: Option<ObjectId> = commit.parent_ids().next().map(|id| id.into());

        let changes: Vec<ChangeDetached> = match first_parent {
            Some(parent_id) => {
                let parent_tree = self.repo.find_commit(parent_id)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::new();
        let mut lines = 0u64;
        for change in changes {
            lines += self.handle_change(change, &mut files);
        }
        Ok((files, lines))
    }

    fn handle_change(&self, change: ChangeDetached, files: &mut Vec<String>) -> u64 {
        match change {
            ChangeDetached::Addition { entry_mode, .. }
            | ChangeDetached::Deletion { entry_mode, .. }
            | ChangeDetached::Modification { entry_mode, .. }
            | ChangeDetached::Rewrite { entry_mode, .. }
                if entry_mode.is_tree() =>
            {
                0
            }
            ChangeDetached::Addition { id, location, .. } => {
                files.push(location.to_string());
                self.blob_text(id).map(|t| t.lines().count() as u64).unwrap_or(0)
            }
            ChangeDetached::Deletion { id, location, .. } => {
                files.push(location.to_string());
                self.blob_text(id).map(|t| t.lines().count() as u64).unwrap_or(0)
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                ..
            } => {
                files.push(location.to_string());
                self.line_delta(previous_id, id)
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                source_location,
                location,
                copy,
                ..
            } => {
                if !copy {
                    files.push(source_location.to_string());
                }
                files.push(location.to_string());
                self.line_delta(source_id, id)
            }
        }
    }

    /// Blob contents as text; `None` for binary or unreadable blobs.
    fn blob_text(&self, id: ObjectId) -> Option<String> {
        let object = self.repo.find_object(id).ok()?;
        let data = object.data.as_slice();
        if data.iter().take(8192).any(|&b| b == 0) {
            return None;
        }
        std::str::from_utf8(data).ok().map(str::to_string)
    }

    fn line_delta(&self, old_id: ObjectId, new_id: ObjectId) -> u64 {
        let (Some(old_text), Some(new_text)) = (self.blob_text(old_id), self.blob_text(new_id)) else {
            return 0;
        };

        TextDiff::from_lines(&old_text, &new_text)
            .iter_all_changes()
            .filter(|c| matches!(c.tag(), ChangeTag::Insert | ChangeTag::Delete))
            .count() as u64
    }
}

impl CommitSource for GixRepo {
    fn location(&self) -> &Path {
        &self.path
    }

    fn resolves(&self, rev: &str) -> Result<bool> {
        Ok(self.peel_to_commit(rev).is_some())
    }

    /// Ordered newest first by commit time, the way `git rev-list` lists
    /// unrelated history.
    fn rev_list(&self, start: &str, end: &str) -> Result<Vec<String>> {
        let start_id = self.require_commit(start)?;
        let end_id = self.require_commit(end)?;

        let hidden: HashSet<ObjectId> = self
            .ancestors(start_id, &HashSet::new())?
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        let mut commits = self.ancestors(end_id, &hidden)?;
        commits.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(commits.into_iter().map(|(id, _)| id.to_string()).collect())
    }

    fn commit_record(&self, id: &str) -> Result<CommitRecord> {
        let oid = ObjectId::from_hex(id.as_bytes())
            .map_err(|e| TallyError::command_failed("gix parse id", format!("invalid commit id '{id}': {e}")))?;
        let commit = self.repo.find_commit(oid)?;

        let signature = commit.author()?;
        let time = signature
            .time()
            .map_err(|e| TallyError::command_failed("gix read commit", format!("invalid author time: {e}")))?;
        let offset = FixedOffset::east_opt(time.offset)
            .ok_or_else(|| TallyError::command_failed("gix read commit", format!("invalid offset {}", time.offset)))?;
        let timestamp = DateTime::from_timestamp(time.seconds, 0)
            .ok_or_else(|| TallyError::command_failed("gix read commit", format!("invalid timestamp {}", time.seconds)))?
            .with_timezone(&offset);

        let author = self
            .mailmap
            .try_resolve_ref(signature)
            .and_then(|resolved| resolved.name)
            .unwrap_or(signature.name)
            .to_string();
        let (files, lines_changed) = self.changed_paths(oid)?;

        Ok(CommitRecord {
            id: oid.to_string(),
            author: author.trim().to_string(),
            timestamp,
            files,
            lines_changed,
        })
    }
}
