//! studyplan-store: SQLite persistence for study tasks, plus CSV bulk import.

pub mod import;
pub mod repository;

pub use import::{import_csv, parse_tasks_csv};
pub use repository::TaskRepository;
