//! Plain-text output for `list` and `plan`.

use std::fmt::Write;
use studyplan_core::{Plan, Task};

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks stored.\n".to_string();
    }

    let mut out = String::new();
    for t in tasks {
        let id = t.id.map(|i| i.to_string()).unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "[{id}] {} | {} | due {} | {:.1}h | difficulty {}",
            t.course, t.name, t.deadline, t.est_hours, t.difficulty
        );
    }
    out
}

pub fn render_plan(plan: &Plan) -> String {
    let (Some(first), Some(last)) = (plan.days.first(), plan.days.last()) else {
        return format!("{}\n", plan.message.as_deref().unwrap_or("Nothing to plan."));
    };

    let mut out = String::new();
    let _ = writeln!(out, "# Study plan {} .. {}\n", first.date, last.date);

    for day in &plan.days {
        let _ = writeln!(out, "{}  {:.1}h", day.date.format("%a %Y-%m-%d"), day.total_hours);
        for s in &day.sessions {
            let _ = writeln!(
                out,
                "  - {}: {}  {:.1}h  (due {})",
                s.course, s.name, s.hours, s.deadline
            );
        }
    }

    let _ = writeln!(out, "\nTotal: {:.1}h", plan.total_hours());
    out
}
