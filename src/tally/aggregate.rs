use crate::model::{CommitRecord, TallyRow};
use crate::util::module_of;
use std::collections::{BTreeSet, HashMap};

/// Commits per author.
pub fn count_by_author<'a>(authors: impl IntoIterator<Item = &'a str>) -> Vec<TallyRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for author in authors {
        *counts.entry(author).or_insert(0) += 1;
    }

    sorted_rows(counts.into_iter().map(|(name, count)| TallyRow::new(name, count)))
}

/// Commits touching each path.
pub fn count_by_file(records: &[CommitRecord]) -> Vec<TallyRow> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        for file in &record.files {
            *counts.entry(file.as_str()).or_insert(0) += 1;
        }
    }

    sorted_rows(counts.into_iter().map(|(name, count)| TallyRow::new(name, count)))
}

/// Distinct modules each author touched.
pub fn count_modules_by_author(records: &[CommitRecord]) -> Vec<TallyRow> {
    let mut modules: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for record in records {
        for file in &record.files {
            modules
                .entry(record.author.as_str())
                .or_default()
                .insert(module_of(file));
        }
    }

    sorted_rows(
        modules
            .into_iter()
            .map(|(name, set)| TallyRow::new(name, set.len())),
    )
}

/// Descending count, ties by ascending name.
pub fn sorted_rows(rows: impl IntoIterator<Item = TallyRow>) -> Vec<TallyRow> {
    let mut rows: Vec<TallyRow> = rows.into_iter().collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}
