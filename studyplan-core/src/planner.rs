//! Study planner: turns a task list into a day-by-day schedule over a fixed horizon.
//!
//! Strategy:
//! - keep only tasks due somewhere inside `[today, today + horizon_days - 1]`
//! - score each one by `(difficulty * est_hours) / days_until_due`
//! - walk tasks by descending score and greedily hand out sessions of at most
//!   [`SESSION_CHUNK_HOURS`], scanning days from the start of the horizon every time
//!
//! The allocation is first-come-first-served: a high-priority task may use up a
//! day's whole capacity before lower-priority tasks are considered, and lower
//! tasks may end up partially scheduled (or not at all). That is not an error.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{PlannerConfig, MAX_PLANNING_HORIZON_DAYS};
use crate::task::Task;

/// Upper bound on the hours of one task placed on one day.
pub const SESSION_CHUNK_HOURS: f64 = 2.0;

pub const NO_TASKS_MESSAGE: &str = "No tasks within the planning horizon.";

/// One block of work on one task on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub task_id: Option<i64>,
    pub course: String,
    pub name: String,
    pub hours: f64,
    pub deadline: NaiveDate,
}

impl Session {
    fn for_task(task: &Task, hours: f64) -> Self {
        Self {
            task_id: task.id,
            course: task.course.clone(),
            name: task.name.clone(),
            hours,
            deadline: task.deadline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub total_hours: f64,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub days: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Plan {
    /// The "nothing to schedule" outcome.
    pub fn empty() -> Self {
        Self {
            days: Vec::new(),
            message: Some(NO_TASKS_MESSAGE.to_string()),
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(|d| d.total_hours).sum()
    }

    /// All sessions with their date, in day order then allocation order.
    pub fn sessions(&self) -> impl Iterator<Item = (NaiveDate, &Session)> {
        self.days
            .iter()
            .flat_map(|d| d.sessions.iter().map(move |s| (d.date, s)))
    }
}

/// Urgency-weighted importance. A task due today divides by 1, the largest
/// possible weight.
pub fn priority_score(task: &Task, today: NaiveDate) -> f64 {
    let days_until_due = (task.deadline - today).num_days().max(0) + 1;
    (f64::from(task.difficulty) * task.est_hours) / days_until_due as f64
}

/// Build a plan for the horizon starting at `today`.
///
/// Ties in priority keep the order the tasks were given in.
pub fn build_plan(tasks: &[Task], config: &PlannerConfig, today: NaiveDate) -> Plan {
    // Capped, and cut short at the last representable date.
    let horizon_days = config.planning_horizon_days.min(MAX_PLANNING_HORIZON_DAYS);
    let horizon: Vec<NaiveDate> = (0..horizon_days)
        .map_while(|offset| today.checked_add_days(Days::new(u64::from(offset))))
        .collect();

    let Some(&horizon_end) = horizon.last() else {
        return Plan::empty();
    };

    let mut eligible: Vec<(f64, &Task)> = tasks
        .iter()
        .filter(|t| t.deadline >= today && t.deadline <= horizon_end)
        .map(|t| (priority_score(t, today), t))
        .collect();

    if eligible.is_empty() {
        debug!(
            total = tasks.len(),
            %today,
            %horizon_end,
            "no tasks inside the planning horizon"
        );
        return Plan::empty();
    }

    // Stable, so equal scores keep input order.
    eligible.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut day_capacity = vec![f64::from(config.max_hours_per_day); horizon.len()];
    let mut day_sessions: Vec<Vec<Session>> = vec![Vec::new(); horizon.len()];

    for &(score, task) in &eligible {
        let mut remaining = task.est_hours;

        for (idx, capacity) in day_capacity.iter_mut().enumerate() {
            if remaining <= 0.0 {
                break;
            }
            // A later day may still have room.
            if *capacity <= 0.0 {
                continue;
            }

            let chunk = SESSION_CHUNK_HOURS.min(*capacity).min(remaining);
            day_sessions[idx].push(Session::for_task(task, chunk));
            remaining -= chunk;
            *capacity -= chunk;
        }

        if remaining > 0.0 {
            debug!(
                task = %task.name,
                score,
                unscheduled_hours = remaining,
                "task only partially scheduled"
            );
        }
    }

    let days = horizon
        .into_iter()
        .zip(day_sessions)
        .map(|(date, sessions)| DayPlan {
            date,
            total_hours: sessions.iter().map(|s| s.hours).sum(),
            sessions,
        })
        .collect();

    debug!(eligible = eligible.len(), "plan built");

    Plan {
        days,
        message: None,
    }
}

/// [`build_plan`] against the local clock's current date.
pub fn build_plan_today(tasks: &[Task], config: &PlannerConfig) -> Plan {
    build_plan(tasks, config, chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
    }

    fn task(id: i64, name: &str, due_in: i64, est_hours: f64, difficulty: i64) -> Task {
        Task::new("ASTRO", name, today() + Duration::days(due_in), est_hours, difficulty)
            .unwrap()
            .with_id(id)
            .unwrap()
    }

    fn hours_for(plan: &Plan, id: i64) -> f64 {
        plan.sessions()
            .filter(|(_, s)| s.task_id == Some(id))
            .map(|(_, s)| s.hours)
            .sum()
    }

    #[test]
    fn test_empty_input() {
        let plan = build_plan(&[], &PlannerConfig::default(), today());
        assert!(plan.days.is_empty());
        assert_eq!(plan.message.as_deref(), Some(NO_TASKS_MESSAGE));
    }

    #[test]
    fn test_allocates_all_hours_in_two_sessions() {
        let t = task(1, "Write LIGO essay", 3, 4.0, 4);
        let plan = build_plan(&[t], &PlannerConfig::new(5, 7), today());

        assert_eq!(plan.days.len(), 7);
        assert!(plan.message.is_none());
        assert!((plan.total_hours() - 4.0).abs() < 1e-9);

        let used: Vec<_> = plan.sessions().collect();
        assert_eq!(used.len(), 2);
        assert_eq!(used[0].0, today());
        assert_eq!(used[1].0, today() + Duration::days(1));
        assert!(used.iter().all(|(_, s)| s.hours <= SESSION_CHUNK_HOURS));
    }

    #[test]
    fn test_far_deadline_is_ignored() {
        let t = task(1, "Final project", 30, 10.0, 3);
        let plan = build_plan(&[t], &PlannerConfig::new(5, 7), today());
        assert!(plan.days.is_empty());
        assert_eq!(plan.message.as_deref(), Some(NO_TASKS_MESSAGE));
    }

    #[test]
    fn test_horizon_bounds() {
        let tasks = vec![
            task(1, "overdue", -1, 3.0, 5),
            task(2, "last day", 6, 1.0, 1),
            task(3, "just past horizon", 7, 3.0, 5),
        ];
        let plan = build_plan(&tasks, &PlannerConfig::new(5, 7), today());

        assert_eq!(hours_for(&plan, 1), 0.0);
        assert_eq!(hours_for(&plan, 2), 1.0);
        assert_eq!(hours_for(&plan, 3), 0.0);
        assert_eq!(plan.days.first().unwrap().date, today());
        assert_eq!(plan.days.last().unwrap().date, today() + Duration::days(6));
    }

    #[test]
    fn test_higher_priority_takes_whole_day() {
        let hard = task(1, "hard", 0, 3.0, 5); // score 15
        let easy = task(2, "easy", 0, 1.0, 1); // score 1

        // Input order deliberately reversed.
        let plan = build_plan(&[easy, hard], &PlannerConfig::new(2, 1), today());
        let day0 = &plan.days[0];
        assert_eq!(day0.sessions.len(), 1);
        assert_eq!(day0.sessions[0].task_id, Some(1));
        assert_eq!(day0.total_hours, 2.0);
        assert_eq!(hours_for(&plan, 2), 0.0);
    }

    #[test]
    fn test_lower_priority_spills_past_its_deadline() {
        let hard = task(1, "hard", 0, 3.0, 5);
        let easy = task(2, "easy", 0, 1.0, 1);

        let plan = build_plan(&[hard, easy], &PlannerConfig::new(2, 7), today());
        assert!(plan.days[0].sessions.iter().all(|s| s.task_id == Some(1)));
        // Day 1 holds the rest of "hard" (1h) and then "easy" (1h).
        let day1: Vec<_> = plan.days[1].sessions.iter().map(|s| (s.task_id, s.hours)).collect();
        assert_eq!(day1, vec![(Some(1), 1.0), (Some(2), 1.0)]);
    }

    #[test]
    fn test_full_day_is_skipped_not_terminal() {
        let first = task(1, "first", 1, 3.0, 5); // score 7.5
        let second = task(2, "second", 6, 4.0, 1); // score 4/7

        let plan = build_plan(&[first, second], &PlannerConfig::new(3, 7), today());

        let per_day: Vec<Vec<(Option<i64>, f64)>> = plan
            .days
            .iter()
            .map(|d| d.sessions.iter().map(|s| (s.task_id, s.hours)).collect())
            .collect();

        assert_eq!(per_day[0], vec![(Some(1), 2.0), (Some(2), 1.0)]);
        assert_eq!(per_day[1], vec![(Some(1), 1.0), (Some(2), 2.0)]);
        assert_eq!(per_day[2], vec![(Some(2), 1.0)]);
        assert!(per_day[3..].iter().all(|d| d.is_empty()));
    }

    #[test]
    fn test_zero_cap_schedules_nothing() {
        let plan = build_plan(&[task(1, "t", 2, 3.0, 3)], &PlannerConfig::new(0, 5), today());
        assert_eq!(plan.days.len(), 5);
        assert!(plan.days.iter().all(|d| d.sessions.is_empty() && d.total_hours == 0.0));
        assert!(plan.message.is_none());
    }

    #[test]
    fn test_zero_horizon_is_empty_plan() {
        let plan = build_plan(&[task(1, "t", 0, 3.0, 3)], &PlannerConfig::new(5, 0), today());
        assert!(plan.days.is_empty());
        assert_eq!(plan.message.as_deref(), Some(NO_TASKS_MESSAGE));
    }

    #[test]
    fn test_horizon_stops_at_calendar_end() {
        let last = NaiveDate::MAX - Duration::days(2);
        let t = Task::new("MATH", "quiz", NaiveDate::MAX, 1.0, 2).unwrap();
        let plan = build_plan(&[t], &PlannerConfig::new(5, 10), last);
        assert_eq!(plan.days.len(), 3);
        assert_eq!(plan.days.last().unwrap().date, NaiveDate::MAX);
        assert_eq!(plan.total_hours(), 1.0);
    }

    #[test]
    fn test_huge_horizon_is_clamped() {
        let t = task(1, "t", 2, 3.0, 3);
        let plan = build_plan(&[t], &PlannerConfig::new(5, u32::MAX), today());
        assert_eq!(plan.days.len(), MAX_PLANNING_HORIZON_DAYS as usize);
        assert_eq!(plan.total_hours(), 3.0);
    }

    #[test]
    fn test_capacity_and_conservation() {
        let tasks: Vec<Task> = (1..=8)
            .map(|i| task(i, &format!("t{i}"), i % 7, 1.5 + i as f64 * 0.7, (i % 5) + 1))
            .collect();
        let cfg = PlannerConfig::new(4, 7);
        let plan = build_plan(&tasks, &cfg, today());

        for day in &plan.days {
            let sum: f64 = day.sessions.iter().map(|s| s.hours).sum();
            assert!(sum <= f64::from(cfg.max_hours_per_day) + 1e-9);
            assert!((sum - day.total_hours).abs() < 1e-9);
            assert!(day.sessions.iter().all(|s| s.hours > 0.0 && s.hours <= SESSION_CHUNK_HOURS));
        }
        for t in &tasks {
            assert!(hours_for(&plan, t.id.unwrap()) <= t.est_hours + 1e-9);
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let a = task(1, "a", 2, 2.0, 3);
        let b = task(2, "b", 2, 2.0, 3);
        let plan = build_plan(&[b, a], &PlannerConfig::new(2, 3), today());
        assert_eq!(plan.days[0].sessions[0].task_id, Some(2));
        assert_eq!(plan.days[1].sessions[0].task_id, Some(1));
    }

    #[test]
    fn test_deterministic() {
        let tasks = vec![task(1, "a", 1, 5.0, 2), task(2, "b", 3, 7.0, 4), task(3, "c", 0, 1.0, 1)];
        let cfg = PlannerConfig::new(3, 5);
        assert_eq!(build_plan(&tasks, &cfg, today()), build_plan(&tasks, &cfg, today()));
    }

    #[test]
    fn test_priority_score_due_today() {
        let t = task(1, "now", 0, 3.0, 4);
        assert_eq!(priority_score(&t, today()), 12.0);
        let later = task(2, "later", 3, 3.0, 4);
        assert_eq!(priority_score(&later, today()), 3.0);
    }

    #[test]
    fn test_unpersisted_tasks_have_null_id() {
        let t = Task::new("MATH", "quiz", today(), 1.0, 2).unwrap();
        let plan = build_plan(&[t], &PlannerConfig::default(), today());
        let v = serde_json::to_value(&plan).unwrap();
        assert!(v.get("message").is_none());
        assert!(v["days"][0]["sessions"][0]["task_id"].is_null());
        assert_eq!(v["days"][0]["date"], "2026-02-19");
        assert_eq!(v["days"][0]["sessions"][0]["deadline"], "2026-02-19");
    }

    #[test]
    fn test_empty_plan_json() {
        let v = serde_json::to_value(Plan::empty()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"days": [], "message": "No tasks within the planning horizon."})
        );
    }
}
