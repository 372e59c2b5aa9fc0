use crate::error::{Result, TallyError};
use crate::git::log::{parse_activity_log, ActivityLog, HEADER_FORMAT};
use crate::git::CommitSource;
use crate::model::{CommitActivity, CommitRecord};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

/// [`CommitSource`] backed by the `git` executable.
pub struct GitCommand {
    program: String,
    workdir: PathBuf,
}

impl GitCommand {
    /// Use `program` inside `path`, or the current dir if `None`.
    ///
    /// Fails with `CommandFailed` when git is missing or `path` is not a repository.
    pub fn open<P: AsRef<Path>>(program: &str, path: Option<P>) -> Result<Self> {
        let workdir = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };
        let git = Self {
            program: program.to_string(),
            workdir,
        };
        git.run(&["rev-parse", "--git-dir"])?;
        Ok(git)
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!("{} {}", self.program, args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TallyError::command_failed(self.describe(args), format!("failed to run git: {e}")))
    }

    /// Runs git and returns stdout, failing on a non-zero exit.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(TallyError::command_failed(
                self.describe(args),
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn changed_files(&self, id: &str) -> Result<Vec<String>> {
        let out = self.run(&["diff-tree", "--root", "--no-commit-id", "--name-only", "-r", "-z", id])?;
        Ok(out
            .split('\0')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl CommitSource for GitCommand {
    fn location(&self) -> &Path {
        &self.workdir
    }

    fn resolves(&self, rev: &str) -> Result<bool> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.output(&["cat-file", "-e", &spec])?;
        Ok(output.status.success())
    }

    fn rev_list(&self, start: &str, end: &str) -> Result<Vec<String>> {
        let range = format!("{start}..{end}");
        let out = self.run(&["rev-list", &range])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn commit_record(&self, id: &str) -> Result<CommitRecord> {
        let listing = self.run(&["log", "-1", HEADER_FORMAT, "--shortstat", id])?;
        let mut activity = parse_activity_log(&listing)?;
        if activity.len() != 1 {
            return Err(TallyError::command_failed(
                self.describe(&["log", "-1", id]),
                format!("expected one commit, got {}", activity.len()),
            ));
        }
        let activity = activity.remove(0);
        let files = self.changed_files(id)?;

        Ok(CommitRecord {
            id: activity.id,
            author: activity.author,
            timestamp: activity.timestamp,
            files,
            lines_changed: activity.lines_changed,
        })
    }

    /// Streams one `git log --shortstat` over the whole range.
    fn range_activity(&self, start: &str, end: &str) -> Result<Vec<CommitActivity>> {
        let range = format!("{start}..{end}");
        let args = ["log", range.as_str(), HEADER_FORMAT, "--shortstat"];
        let describe = self.describe(&args);

        let mut child = self
            .command(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TallyError::command_failed(&describe, format!("failed to run git: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TallyError::command_failed(&describe, "failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| TallyError::command_failed(&describe, "failed to capture stderr"))?;

        let stderr_reader = thread::spawn(move || {
            let mut text = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut text);
            text
        });

        let mut log = ActivityLog::new();
        for line in BufReader::new(stdout).split(b'\n') {
            let line = line.map_err(|e| TallyError::command_failed(&describe, format!("failed reading output: {e}")))?;
            let line = String::from_utf8_lossy(&line);
            if let Err(e) = log.push_line(line.trim_end_matches('\r')) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }

        let status = child
            .wait()
            .map_err(|e| TallyError::command_failed(&describe, format!("failed to wait for git: {e}")))?;
        let stderr_text = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(TallyError::command_failed(describe, stderr_text));
        }

        let activity = log.finish();
        tracing::info!("{} commits in {range}", activity.len());
        Ok(activity)
    }
}
