use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_HOURS_PER_DAY: u32 = 5;
pub const DEFAULT_PLANNING_HORIZON_DAYS: u32 = 7;
/// Ten years. Longer horizons are rejected by config validation and clamped by the planner.
pub const MAX_PLANNING_HORIZON_DAYS: u32 = 3660;

/// The numeric knobs the planner reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Cap on total session hours for any single day. Zero is legal and schedules nothing.
    pub max_hours_per_day: u32,
    /// Consecutive days, starting today, that the plan covers.
    pub planning_horizon_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_hours_per_day: DEFAULT_MAX_HOURS_PER_DAY,
            planning_horizon_days: DEFAULT_PLANNING_HORIZON_DAYS,
        }
    }
}

impl PlannerConfig {
    pub fn new(max_hours_per_day: u32, planning_horizon_days: u32) -> Self {
        Self {
            max_hours_per_day,
            planning_horizon_days,
        }
    }
}
