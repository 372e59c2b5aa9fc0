use assert_cmd::prelude::*;
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(out.status.success(), "git {args:?} failed: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout).unwrap().trim().to_string()
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Writes `files`, commits them as `author` at `date`, returns the new hash.
fn commit_files(dir: &Path, files: &[(&str, &str)], author: &str, date: &str) -> String {
    commit_files_at(dir, files, author, date, date)
}

/// Like [`commit_files`] with separate author and committer dates.
fn commit_files_at(
    dir: &Path,
    files: &[(&str, &str)],
    author: &str,
    author_date: &str,
    committer_date: &str,
) -> String {
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }
    git(dir, &["add", "."]);
    let status = Command::new("git")
        .args([
            "commit",
            "-q",
            "-m",
            &format!("change by {author}"),
            &format!("--author={author} <{}@example.com>", author.to_lowercase()),
        ])
        .env("GIT_AUTHOR_DATE", author_date)
        .env("GIT_COMMITTER_DATE", committer_date)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success());
    git(dir, &["rev-parse", "HEAD"])
}

struct Fixture {
    dir: tempfile::TempDir,
    start: String,
    end: String,
}

impl Fixture {
    fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Base commit, then three commits by Alice over two months and one by Bob.
fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    let start = commit_files(dir.path(), &[("README.md", "hello\n")], "Base", "2023-12-01T12:00:00+00:00");
    commit_files(
        dir.path(),
        &[("src/main/scala/core/A.scala", "a\n")],
        "Alice",
        "2024-01-10T12:00:00+00:00",
    );
    commit_files(
        dir.path(),
        &[("src/main/scala/core/B.scala", "b\nb\n")],
        "Alice",
        "2024-01-20T12:00:00+00:00",
    );
    commit_files(
        dir.path(),
        &[("README.md", "hello\nworld\n"), ("src/main/scala/api/X.scala", "x\n")],
        "Bob",
        "2024-02-05T12:00:00+00:00",
    );
    let end = commit_files(
        dir.path(),
        &[("src/main/scala/core/A.scala", "z\n")],
        "Alice",
        "2024-03-01T12:00:00+00:00",
    );
    Fixture { dir, start, end }
}

/// Base commit with a `.mailmap`, then a `feat` branch whose first commit was
/// authored in January but committed in March, a main-line commit by "carol"
/// (mapped to Carol), and a `--no-ff` merge of `feat` by Dana.
fn branchy_fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let p = dir.path();
    init_git_repo(p);
    let start = commit_files(
        p,
        &[("README.md", "hello\n"), (".mailmap", "Carol <carol@example.com>\n")],
        "Base",
        "2023-12-01T12:00:00+00:00",
    );

    git(p, &["checkout", "-q", "-b", "feat"]);
    commit_files_at(
        p,
        &[("src/main/scala/feat/F.scala", "f\n")],
        "Alice",
        "2024-01-15T12:00:00+00:00",
        "2024-03-15T12:00:00+00:00",
    );
    commit_files(
        p,
        &[("src/main/scala/feat/G.scala", "g\ng\n")],
        "Alice",
        "2024-03-16T12:00:00+00:00",
    );

    git(p, &["checkout", "-q", "-"]);
    commit_files(
        p,
        &[("src/main/scala/core/M.scala", "m\n"), ("docs/ notes .txt", "n\n")],
        "carol",
        "2024-02-10T12:00:00+00:00",
    );

    let merge_date = "2024-03-20T12:00:00+00:00";
    let status = Command::new("git")
        .args(["merge", "--no-ff", "-q", "-m", "merge feat", "feat"])
        .env("GIT_AUTHOR_NAME", "Dana")
        .env("GIT_AUTHOR_EMAIL", "dana@example.com")
        .env("GIT_AUTHOR_DATE", merge_date)
        .env("GIT_COMMITTER_DATE", merge_date)
        .current_dir(p)
        .status()
        .unwrap();
    assert!(status.success());
    let end = git(p, &["rev-parse", "HEAD"]);

    Fixture { dir, start, end }
}

fn run(fx: &Fixture, args: &[&str]) -> std::process::Output {
    let mut cmd = Command::cargo_bin("git-tally").unwrap();
    cmd.current_dir(fx.path()).arg("--repo").arg(fx.path()).args(args);
    cmd.output().unwrap()
}

fn stdout_of(fx: &Fixture, args: &[&str]) -> String {
    let out = run(fx, args);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn authors_table_is_sorted_and_aligned() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = stdout_of(&fx, &["authors", &fx.start, &fx.end]);
    assert_eq!(out, "Alice : 3\nBob   : 1\n");
}

#[test]
fn authors_json_counts_every_commit_once() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = stdout_of(&fx, &["authors", &fx.start, &fx.end, "--json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["report"], "authors");
    assert_eq!(v["total_commits"], 4);
    let sum: u64 = v["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["count"].as_u64().unwrap())
        .sum();
    assert_eq!(sum, 4);
}

#[test]
fn files_counts_commits_per_path() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = stdout_of(&fx, &["files", &fx.start, &fx.end, "--ndjson"]);
    let rows: Vec<(String, u64)> = out
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            (v["name"].as_str().unwrap().to_string(), v["count"].as_u64().unwrap())
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("src/main/scala/core/A.scala".to_string(), 2),
            ("README.md".to_string(), 1),
            ("src/main/scala/api/X.scala".to_string(), 1),
            ("src/main/scala/core/B.scala".to_string(), 1),
        ]
    );
}

#[test]
fn modules_counts_distinct_modules_per_author() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = stdout_of(&fx, &["modules", &fx.start, &fx.end]);
    // Bob: README.md and api; Alice: core only
    assert_eq!(out, "Bob   : 2\nAlice : 1\n");
}

#[test]
fn contributors_writes_aligned_series() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out_file = fx.path().join("series.json");
    let out = run(
        &fx,
        &[
            "contributors",
            &fx.start,
            &fx.end,
            "-o",
            out_file.to_str().unwrap(),
            "--min-commits",
            "2",
        ],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Found 4 commits"));
    assert!(stdout.contains("Included 1 contributors with >= 2 commits"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out_file).unwrap()).unwrap();
    // Bob is filtered out but his month stays on the axis
    assert_eq!(v["timePoints"], serde_json::json!(["2024-01", "2024-02", "2024-03"]));

    let contributors = v["contributors"].as_array().unwrap();
    assert_eq!(contributors.len(), 1);
    let alice = &contributors[0];
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["color"], "#FF6B6B");
    assert_eq!(alice["totalCommits"], 3);
    assert_eq!(alice["totalLinesChanged"], 5);
    assert_eq!(
        alice["data"],
        serde_json::json!([
            {"time": "2024-01", "commits": 2, "linesChanged": 3},
            {"time": "2024-02", "commits": 0, "linesChanged": 0},
            {"time": "2024-03", "commits": 1, "linesChanged": 2},
        ])
    );
}

#[test]
fn contributors_stdout_mode_prints_document() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = stdout_of(&fx, &["contributors", &fx.start, &fx.end, "--stdout", "--min-commits", "1"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    let contributors = v["contributors"].as_array().unwrap();
    assert_eq!(contributors.len(), 2);
    assert_eq!(contributors[1]["name"], "Bob");
    assert_eq!(contributors[1]["color"], "#4ECDC4");
    assert!(!fx.path().join("contributors_data.json").exists());
}

#[test]
fn missing_start_commit_fails_without_output() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let bogus = "0000000000000000000000000000000000000001";
    let out = run(&fx, &["contributors", bogus, &fx.end]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(bogus), "stderr: {stderr}");
    assert!(!stderr.contains(&fx.end), "only the bad commit is cited: {stderr}");
    assert!(!fx.path().join("contributors_data.json").exists());
}

#[test]
fn both_missing_commits_are_reported() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = run(&fx, &["authors", "nope-start", "nope-end"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("nope-start") && stderr.contains("nope-end"), "stderr: {stderr}");
}

#[test]
fn empty_range_is_an_error_for_contributors() {
    if !has_git() {
        return;
    }
    let fx = fixture();
    let out = run(&fx, &["contributors", &fx.end, &fx.end]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No commits found"));
    assert!(!fx.path().join("contributors_data.json").exists());
}

#[test]
fn outside_a_repository_fails() {
    if !has_git() {
        return;
    }
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("git-tally").unwrap();
    cmd.current_dir(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap())
        .args(["authors", "HEAD~1", "HEAD"]);
    cmd.assert().failure();
}

#[test]
fn gix_backend_agrees_with_git() {
    if !has_git() {
        return;
    }
    for fx in [fixture(), branchy_fixture()] {
        for report in ["authors", "files", "modules"] {
            let via_git = stdout_of(&fx, &[report, &fx.start, &fx.end]);
            let via_gix = stdout_of(&fx, &["--backend", "gix", report, &fx.start, &fx.end]);
            assert_eq!(via_git, via_gix, "{report} differs between backends");
        }
        let args = ["contributors", fx.start.as_str(), fx.end.as_str(), "--stdout", "--min-commits", "1"];
        let via_git = stdout_of(&fx, &args);
        let mut gix_args = vec!["--backend", "gix"];
        gix_args.extend(args);
        let via_gix = stdout_of(&fx, &gix_args);
        assert_eq!(via_git, via_gix, "contributors differs between backends");
    }
}

#[test]
fn months_follow_the_author_date() {
    if !has_git() {
        return;
    }
    let fx = branchy_fixture();
    for backend in ["git", "gix"] {
        let out = stdout_of(
            &fx,
            &["--backend", backend, "contributors", &fx.start, &fx.end, "--stdout", "--min-commits", "1"],
        );
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        // January exists only as the author date of a commit made in March
        assert_eq!(
            v["timePoints"],
            serde_json::json!(["2024-01", "2024-02", "2024-03"]),
            "{backend}"
        );
        let alice = &v["contributors"][0];
        assert_eq!(alice["name"], "Alice", "{backend}");
        assert_eq!(alice["data"][0]["commits"], 1, "{backend}");
        assert_eq!(alice["data"][2]["commits"], 1, "{backend}");
    }
}

#[test]
fn merges_add_no_files_or_lines() {
    if !has_git() {
        return;
    }
    let fx = branchy_fixture();
    for backend in ["git", "gix"] {
        let out = stdout_of(&fx, &["--backend", backend, "files", &fx.start, &fx.end, "--ndjson"]);
        let counts: Vec<u64> = out
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["count"].as_u64().unwrap())
            .collect();
        assert_eq!(counts, vec![1, 1, 1, 1], "{backend}: {out}");

        let out = stdout_of(
            &fx,
            &["--backend", backend, "contributors", &fx.start, &fx.end, "--stdout", "--min-commits", "1"],
        );
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        let dana = v["contributors"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "Dana")
            .unwrap();
        assert_eq!(dana["totalCommits"], 1, "{backend}");
        assert_eq!(dana["totalLinesChanged"], 0, "{backend}");
    }
}

#[test]
fn mailmap_names_apply_in_both_backends() {
    if !has_git() {
        return;
    }
    let fx = branchy_fixture();
    for backend in ["git", "gix"] {
        let out = stdout_of(&fx, &["--backend", backend, "authors", &fx.start, &fx.end]);
        assert_eq!(out, "Alice : 2\nCarol : 1\nDana  : 1\n", "{backend}");
    }
}

#[test]
fn paths_keep_surrounding_spaces() {
    if !has_git() {
        return;
    }
    let fx = branchy_fixture();
    for backend in ["git", "gix"] {
        let out = stdout_of(&fx, &["--backend", backend, "files", &fx.start, &fx.end, "--ndjson"]);
        let names: Vec<String> = out
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["name"].as_str().unwrap().to_string())
            .collect();
        assert!(names.contains(&"docs/ notes .txt".to_string()), "{backend}: {names:?}");
    }
}
