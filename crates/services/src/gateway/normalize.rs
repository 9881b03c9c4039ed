use serde_json::{Map, Value};
use tracing::warn;

use redshift_core::model::{
    CourseProgress, DEFAULT_MONTH, DEFAULT_TOPIC, DEFAULT_TOTAL_MONTHS, DEFAULT_TOTAL_WEEKS,
    DEFAULT_WEEK, DashboardSnapshot, Student, Task, TaskId, TaskStatus, UNKNOWN_COHORT,
    UNKNOWN_STUDENT,
};

/// Builds a snapshot from the `data` object of a successful login response.
///
/// Sheet cells arrive loosely typed: counters may be numbers or numeric
/// strings, ids may be numbers, list cells are comma-separated text. Empty or
/// missing values fall back to defaults; progress counters are always
/// derived from the task rows.
#[must_use]
pub fn normalize_login_payload(data: &Value) -> DashboardSnapshot {
    let empty = Map::new();
    let student_row = data.get("student").and_then(Value::as_object).unwrap_or(&empty);
    let settings = data.get("settings").and_then(Value::as_object).unwrap_or(&empty);

    let student = Student::new(
        present_text(student_row.get("name")).unwrap_or_else(|| UNKNOWN_STUDENT.into()),
        present_text(student_row.get("cohort")).unwrap_or_else(|| UNKNOWN_COHORT.into()),
    );
    let current_topic =
        present_text(settings.get("currentTopic")).unwrap_or_else(|| DEFAULT_TOPIC.into());

    let tasks: Vec<Task> = data
        .get("tasks")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().map(normalize_task).collect())
        .unwrap_or_default();

    let progress = CourseProgress::derive(
        count_or(settings.get("currentWeek"), DEFAULT_WEEK),
        count_or(settings.get("currentMonth"), DEFAULT_MONTH),
        count_or(settings.get("totalWeeks"), DEFAULT_TOTAL_WEEKS),
        count_or(settings.get("totalMonths"), DEFAULT_TOTAL_MONTHS),
        &tasks,
    );

    DashboardSnapshot::new(student, tasks, progress, current_topic)
}

fn normalize_task(row: &Value) -> Task {
    let field = |name: &str| row.get(name);

    let id = loose_text(field("id"));
    let status = match field("status") {
        Some(Value::String(raw)) => raw.parse().unwrap_or_else(|err| {
            warn!(task = %id, error = %err, "unknown task status, treating as live");
            TaskStatus::Live
        }),
        _ => {
            warn!(task = %id, "task row without status, treating as live");
            TaskStatus::Live
        }
    };

    Task {
        id: TaskId::new(id),
        title: loose_text(field("title")),
        description: loose_text(field("description")),
        reference_links: split_list(field("referenceLinks")),
        learning_materials: split_list(field("learningMaterials")),
        status,
        week_id: count_or(field("weekId"), 0),
    }
}

/// Splits a comma-separated cell into trimmed, non-empty entries.
///
/// Missing or empty cells become an empty list.
#[must_use]
pub fn split_list(value: Option<&Value>) -> Vec<String> {
    present_text(value)
        .map(|text| {
            text.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Text for any scalar cell, empty for null or missing.
fn loose_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Text for a cell that holds a real value; blank strings, zero, false and null count as absent.
fn present_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::Number(num) if num.as_f64() == Some(0.0) => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Coerces a numeric or numeric-string cell, falling back to `default` for
/// blank, non-numeric or negative cells.
///
/// A numeric `0` is a blank cell, while the text `"0"` is kept as zero.
fn count_or(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(num)) => num.as_f64().filter(|num| *num != 0.0),
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(num) if num.is_finite() && num >= 0.0 => {
            // Saturating float-to-int conversion; fractional cells round down.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = num as u32;
            count
        }
        _ => default,
    }
}
