//! REST handlers: health, task CRUD and plan generation.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use studyplan_core::{build_plan, parse_deadline, today_in, Task};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::payload::task_from_body;
use crate::state::AppState;

pub const NO_TASKS_STORED_MESSAGE: &str = "No tasks available";

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /tasks`
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.repo.list_tasks()?))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = task_from_body(&body)?;
    let created = state.repo.add_task(&task)?;
    info!(id = created.id, course = %created.course, "created task");
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    /// Plan as if this date (YYYY-MM-DD) were today.
    pub today: Option<String>,
}

/// `GET /plan`
pub async fn get_plan(
    State(state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Json<Value>> {
    let today = match query.today.as_deref() {
        Some(s) => parse_deadline(s).map_err(|e| ApiError::invalid(e.to_string()))?,
        None => today_in(state.timezone.as_deref())?,
    };

    let tasks = state.repo.list_tasks()?;
    if tasks.is_empty() {
        return Ok(Json(json!({ "message": NO_TASKS_STORED_MESSAGE })));
    }

    let plan = build_plan(&tasks, &state.planner, today);
    info!(tasks = tasks.len(), %today, "generated plan");

    let body = serde_json::to_value(&plan).map_err(anyhow::Error::from)?;
    Ok(Json(body))
}
