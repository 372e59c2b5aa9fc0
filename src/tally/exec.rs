use super::{count_by_author, count_by_file, count_modules_by_author, output_json, output_ndjson, output_table, RangeMeta};
use crate::cli::CommonArgs;
use crate::git::{open_source, verify_range};
use crate::model::{Report, TallyRow};
use anyhow::Context;

pub fn exec(common: CommonArgs, report: Report, start: String, end: String, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let source = open_source(common.backend, common.repo.as_deref(), &common.git)
        .context("Failed to open git repository")?;

    verify_range(source.as_ref(), &start, &end)?;

    let (rows, total_commits): (Vec<TallyRow>, usize) = match report {
        Report::Authors => {
            let activity = source
                .range_activity(&start, &end)
                .context("Failed to list commits")?;
            (count_by_author(activity.iter().map(|c| c.author.as_str())), activity.len())
        }
        Report::Files => {
            let records = source
                .range_records(&start, &end)
                .context("Failed to read commits")?;
            (count_by_file(&records), records.len())
        }
        Report::Modules => {
            let records = source
                .range_records(&start, &end)
                .context("Failed to read commits")?;
            (count_modules_by_author(&records), records.len())
        }
    };

    let meta = RangeMeta {
        repository_path: source.location().to_string_lossy().to_string(),
        start: &start,
        end: &end,
        total_commits,
    };

    if json {
        output_json(&rows, report, &meta)?;
    } else if ndjson {
        output_ndjson(&rows)?;
    } else {
        output_table(&rows, report, &meta)?;
    }

    Ok(())
}
