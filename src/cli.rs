use crate::git::Backend;
use crate::model::Report;
use crate::timeline::{ContributorOptions, DEFAULT_MIN_COMMITS};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-tally")]
#[command(about = "Commit statistics between two git revisions")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = Backend::Git, help = "How to read the repository")]
    pub backend: Backend,

    #[arg(long, global = true, default_value = "git", help = "git executable used by the git backend")]
    pub git: String,

    #[arg(short, long, global = true, help = "Log every git invocation")]
    pub verbose: bool,
}

#[derive(Args, Clone)]
pub struct RangeArgs {
    #[arg(help = "Start of the range (excluded)")]
    pub start: String,

    #[arg(help = "End of the range (included)")]
    pub end: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commits per author
    Authors {
        #[clap(flatten)]
        range: RangeArgs,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Commits touching each file
    Files {
        #[clap(flatten)]
        range: RangeArgs,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Distinct modules touched per author
    Modules {
        #[clap(flatten)]
        range: RangeArgs,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Monthly commit and line counts per contributor, as visualization JSON
    Contributors {
        #[clap(flatten)]
        range: RangeArgs,

        #[arg(short, long, default_value = "contributors_data.json", help = "Output JSON file")]
        output: PathBuf,

        #[arg(long, default_value_t = DEFAULT_MIN_COMMITS, help = "Minimum commits to include contributor")]
        min_commits: u64,

        #[arg(long, default_value_t = 10, help = "Contributors listed in the summary")]
        top: usize,

        #[arg(long, help = "Print the document instead of writing the output file")]
        stdout: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Authors { range, json, ndjson } => {
                crate::tally::exec(self.common, Report::Authors, range.start, range.end, json, ndjson)
            }
            Commands::Files { range, json, ndjson } => {
                crate::tally::exec(self.common, Report::Files, range.start, range.end, json, ndjson)
            }
            Commands::Modules { range, json, ndjson } => {
                crate::tally::exec(self.common, Report::Modules, range.start, range.end, json, ndjson)
            }
            Commands::Contributors { range, output, min_commits, top, stdout } => crate::timeline::exec(
                self.common,
                range.start,
                range.end,
                ContributorOptions {
                    output,
                    min_commits,
                    top,
                    stdout,
                },
            ),
        }
    }
}
