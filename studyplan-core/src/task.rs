//! Task model: one study item with a deadline, an effort estimate and a difficulty.
//!
//! Tasks are validated when they are built (`Task::new`) and again whenever they
//! are deserialized, so everything downstream (storage, planner) can trust the
//! invariants below without re-checking.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },

    #[error("est_hours must be a positive number, got {0}")]
    NonPositiveHours(f64),

    #[error("difficulty must be between 1 and 5, got {0}")]
    DifficultyOutOfRange(i64),

    #[error("id must be a positive integer, got {0}")]
    InvalidId(i64),
}

/// A study task.
///
/// `id` is `None` until the task has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTask")]
pub struct Task {
    pub id: Option<i64>,
    pub course: String,
    pub name: String,
    pub deadline: NaiveDate,

    /// Total estimated effort in hours.
    pub est_hours: f64,

    /// 1-5.
    pub difficulty: u8,
}

impl Task {
    /// Build a validated task. Text fields are trimmed before the emptiness check.
    pub fn new(
        course: impl AsRef<str>,
        name: impl AsRef<str>,
        deadline: NaiveDate,
        est_hours: f64,
        difficulty: i64,
    ) -> Result<Self, TaskError> {
        let course = non_empty("course", course.as_ref())?;
        let name = non_empty("name", name.as_ref())?;

        if !est_hours.is_finite() || est_hours <= 0.0 {
            return Err(TaskError::NonPositiveHours(est_hours));
        }

        if difficulty < i64::from(MIN_DIFFICULTY) || difficulty > i64::from(MAX_DIFFICULTY) {
            return Err(TaskError::DifficultyOutOfRange(difficulty));
        }

        Ok(Self {
            id: None,
            course,
            name,
            deadline,
            est_hours,
            difficulty: difficulty as u8,
        })
    }

    pub fn with_id(mut self, id: i64) -> Result<Self, TaskError> {
        if id <= 0 {
            return Err(TaskError::InvalidId(id));
        }
        self.id = Some(id);
        Ok(self)
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<String, TaskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText { field });
    }
    Ok(trimmed.to_string())
}

/// Wire shape, funneled through `Task::new` on deserialize.
#[derive(Deserialize)]
struct RawTask {
    #[serde(default)]
    id: Option<i64>,
    course: String,
    name: String,
    deadline: NaiveDate,
    est_hours: f64,
    difficulty: i64,
}

impl TryFrom<RawTask> for Task {
    type Error = TaskError;

    fn try_from(raw: RawTask) -> Result<Self, Self::Error> {
        let task = Task::new(raw.course, raw.name, raw.deadline, raw.est_hours, raw.difficulty)?;
        match raw.id {
            Some(id) => task.with_id(id),
            None => Ok(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_trims_text() {
        let t = Task::new("  ASTRO ", "\tWrite LIGO essay\n", day(2026, 3, 1), 4.0, 4).unwrap();
        assert_eq!(t.course, "ASTRO");
        assert_eq!(t.name, "Write LIGO essay");
        assert_eq!(t.id, None);
    }

    #[test]
    fn test_rejects_blank_course() {
        let err = Task::new("   ", "essay", day(2026, 3, 1), 1.0, 1).unwrap_err();
        assert_eq!(err, TaskError::EmptyText { field: "course" });
    }

    #[test]
    fn test_rejects_non_positive_hours() {
        assert!(Task::new("A", "b", day(2026, 3, 1), 0.0, 3).is_err());
        assert!(Task::new("A", "b", day(2026, 3, 1), -1.5, 3).is_err());
        assert!(Task::new("A", "b", day(2026, 3, 1), f64::NAN, 3).is_err());
        assert!(Task::new("A", "b", day(2026, 3, 1), f64::INFINITY, 3).is_err());
    }

    #[test]
    fn test_difficulty_bounds() {
        assert!(Task::new("A", "b", day(2026, 3, 1), 1.0, 0).is_err());
        assert!(Task::new("A", "b", day(2026, 3, 1), 1.0, 6).is_err());
        assert_eq!(Task::new("A", "b", day(2026, 3, 1), 1.0, 5).unwrap().difficulty, 5);
    }

    #[test]
    fn test_with_id_requires_positive() {
        let t = Task::new("A", "b", day(2026, 3, 1), 1.0, 2).unwrap();
        assert_eq!(t.clone().with_id(0), Err(TaskError::InvalidId(0)));
        assert_eq!(t.with_id(7).unwrap().id, Some(7));
    }

    #[test]
    fn test_json_shape() {
        let t = Task::new("MATH", "Problem set", day(2026, 3, 1), 2.5, 3)
            .unwrap()
            .with_id(3)
            .unwrap();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["id"], 3);
        assert_eq!(v["deadline"], "2026-03-01");
        assert_eq!(v["est_hours"], 2.5);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Task = serde_json::from_str(
            r#"{"course":" MATH ","name":"Quiz","deadline":"2026-03-01","est_hours":1,"difficulty":2}"#,
        )
        .unwrap();
        assert_eq!(ok.course, "MATH");
        assert_eq!(ok.id, None);

        let bad = serde_json::from_str::<Task>(
            r#"{"course":"MATH","name":"Quiz","deadline":"2026-03-01","est_hours":1,"difficulty":9}"#,
        );
        assert!(bad.is_err());
    }
}
