//! Bulk task import from CSV.
//!
//! Expected header (column order is free, extra columns are ignored):
//!   course,name,deadline,est_hours,difficulty
//!
//! Every row goes through `Task::new`; the first bad row aborts the import with
//! its line number so nothing is half-imported.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;
use studyplan_core::{parse_deadline, Task};
use tracing::info;

use crate::repository::TaskRepository;

const COLUMNS: [&str; 5] = ["course", "name", "deadline", "est_hours", "difficulty"];

/// Parse tasks from CSV text. Returned tasks have no id yet.
pub fn parse_tasks_csv(reader: impl Read) -> Result<Vec<Task>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().context("read CSV header")?.clone();
    let mut idx = [0usize; 5];
    for (slot, col) in idx.iter_mut().zip(COLUMNS) {
        *slot = match headers.iter().position(|h| h.eq_ignore_ascii_case(col)) {
            Some(i) => i,
            None => bail!("CSV is missing the '{col}' column"),
        };
    }
    let [course, name, deadline, est_hours, difficulty] = idx;

    let mut tasks = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| record.get(i).unwrap_or("");

        let parsed_deadline =
            parse_deadline(field(deadline)).with_context(|| format!("line {line}: deadline"))?;
        let parsed_hours: f64 = field(est_hours)
            .parse()
            .with_context(|| format!("line {line}: est_hours '{}'", field(est_hours)))?;
        let parsed_difficulty: i64 = field(difficulty)
            .parse()
            .with_context(|| format!("line {line}: difficulty '{}'", field(difficulty)))?;

        let task = Task::new(
            field(course),
            field(name),
            parsed_deadline,
            parsed_hours,
            parsed_difficulty,
        )
        .with_context(|| format!("line {line}"))?;
        tasks.push(task);
    }

    Ok(tasks)
}

/// Parse a CSV file and store every task. Returns the stored tasks with ids.
pub fn import_csv(repo: &TaskRepository, path: impl AsRef<Path>) -> Result<Vec<Task>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let tasks = parse_tasks_csv(file).with_context(|| format!("parse {}", path.display()))?;

    let stored = repo
        .add_tasks(&tasks)
        .with_context(|| format!("store {}", path.display()))?;

    info!(count = stored.len(), path = %path.display(), "imported tasks");
    Ok(stored)
}
