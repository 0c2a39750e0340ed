//! Lenient decoding of `POST /tasks` bodies.
//!
//! Numbers may arrive as JSON numbers or numeric strings. `course` and `name`
//! default to empty and are then rejected by task validation.

use serde_json::{Map, Value};
use studyplan_core::{parse_deadline, Task};

use crate::error::{ApiError, ApiResult};

pub fn task_from_body(body: &[u8]) -> ApiResult<Task> {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(ApiError::MissingBody),
    };

    // Presence and parsing interleave: deadline key, est_hours, difficulty, then
    // the deadline text. The first failure in that order is the one reported.
    let deadline = required(&payload, "deadline")?;

    let est_hours = required(&payload, "est_hours")?;
    let est_hours = as_f64(est_hours)
        .ok_or_else(|| ApiError::invalid(format!("est_hours must be a number, got {est_hours}")))?;

    let difficulty = required(&payload, "difficulty")?;
    let difficulty = as_i64(difficulty).ok_or_else(|| {
        ApiError::invalid(format!("difficulty must be an integer, got {difficulty}"))
    })?;

    let deadline = deadline
        .as_str()
        .ok_or_else(|| ApiError::invalid(format!("deadline must be a date string, got {deadline}")))
        .and_then(|s| parse_deadline(s).map_err(|e| ApiError::invalid(e.to_string())))?;

    let course = text(&payload, "course");
    let name = text(&payload, "name");

    Ok(Task::new(course, name, deadline, est_hours, difficulty)?)
}

fn required<'a>(payload: &'a Map<String, Value>, key: &'static str) -> ApiResult<&'a Value> {
    payload.get(key).ok_or(ApiError::MissingField(key))
}

fn text(payload: &Map<String, Value>, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whole numbers only; `4.0` is accepted, `4.5` is not.
fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
