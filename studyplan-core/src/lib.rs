//! studyplan-core: task model and the day-by-day study planner

pub mod config;
pub mod planner;
pub mod task;
pub mod time;

pub use config::{PlannerConfig, MAX_PLANNING_HORIZON_DAYS};
pub use planner::{
    build_plan, build_plan_today, priority_score, DayPlan, Plan, Session, NO_TASKS_MESSAGE,
    SESSION_CHUNK_HOURS,
};
pub use task::{Task, TaskError};
pub use time::{parse_deadline, today_in};
