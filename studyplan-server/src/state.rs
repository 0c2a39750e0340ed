use std::sync::Arc;
use studyplan_core::PlannerConfig;
use studyplan_store::TaskRepository;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<TaskRepository>,
    pub planner: PlannerConfig,
    /// IANA zone used to decide what "today" is; the server's local clock when unset.
    pub timezone: Option<String>,
}

impl AppState {
    pub fn new(repo: TaskRepository, planner: PlannerConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            planner,
            timezone: None,
        }
    }

    pub fn with_timezone(mut self, tz: impl Into<String>) -> Self {
        self.timezone = Some(tz.into());
        self
    }
}
