//! SQLite-backed task repository.
//!
//! One connection per repository, guarded by a mutex so the repository can be
//! shared across request handlers. Rows are re-validated through `Task::new` on
//! read, so a hand-edited database cannot feed bad values to the planner.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use studyplan_core::{parse_deadline, Task};
use tracing::debug;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    course      TEXT NOT NULL,
    name        TEXT NOT NULL,
    deadline    TEXT NOT NULL,
    est_hours   REAL NOT NULL,
    difficulty  INTEGER NOT NULL
);";

pub struct TaskRepository {
    conn: Mutex<Connection>,
}

impl TaskRepository {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("open task database {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().context("open in-memory database")?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).context("create tasks table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("task database lock poisoned"))
    }

    /// Insert a task and return it with its storage-assigned id.
    pub fn add_task(&self, task: &Task) -> Result<Task> {
        let conn = self.conn()?;
        insert(&conn, task)
    }

    /// Insert every task or none of them.
    pub fn add_tasks(&self, tasks: &[Task]) -> Result<Vec<Task>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().context("begin import transaction")?;
        let stored = tasks
            .iter()
            .map(|t| insert(&tx, t))
            .collect::<Result<Vec<_>>>()?;
        tx.commit().context("commit import transaction")?;
        debug!(count = stored.len(), "tasks stored");
        Ok(stored)
    }

    /// All stored tasks in insertion (id) order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, course, name, deadline, est_hours, difficulty FROM tasks ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, course, name, deadline, est_hours, difficulty) = row?;
            let deadline = parse_deadline(&deadline).with_context(|| format!("task {id}"))?;
            let task = Task::new(course, name, deadline, est_hours, difficulty)
                .and_then(|t| t.with_id(id))
                .with_context(|| format!("task {id} fails validation"))?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// Delete every task. Returns the number of rows removed.
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self
            .conn()?
            .execute("DELETE FROM tasks", [])
            .context("clear tasks")?;
        Ok(removed)
    }
}

fn insert(conn: &Connection, task: &Task) -> Result<Task> {
    conn.execute(
        "INSERT INTO tasks (course, name, deadline, est_hours, difficulty)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            task.course,
            task.name,
            task.deadline.format("%Y-%m-%d").to_string(),
            task.est_hours,
            i64::from(task.difficulty),
        ],
    )
    .with_context(|| format!("insert task '{}'", task.name))?;

    let id = conn.last_insert_rowid();
    debug!(id, course = %task.course, name = %task.name, "task stored");

    Ok(task.clone().with_id(id)?)
}
