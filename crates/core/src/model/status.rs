use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatusParseError {
    #[error("unknown task status: {0:?}")]
    Unknown(String),
}

//
// ─── TASK STATUS ──────────────────────────────────────────────────────────────
//

/// Lifecycle state of a weekly task.
///
/// The set is categorical; variant order carries no meaning.
/// - `Live`: open for a first submission
/// - `Submitted`: handed in, waiting for review
/// - `Resubmitted`: handed in again after an earlier submission
/// - `Redo`: sent back by the educator
/// - `Checked`: verified by the educator, terminal
/// - `Locked`: not yet actionable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Live,
    Submitted,
    Resubmitted,
    Redo,
    Checked,
    Locked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Live,
        TaskStatus::Submitted,
        TaskStatus::Resubmitted,
        TaskStatus::Redo,
        TaskStatus::Checked,
        TaskStatus::Locked,
    ];

    /// Status a task moves to when the student submits work for it.
    ///
    /// Anything already handed in (or sent back for a redo) becomes
    /// `Resubmitted`; every other status becomes `Submitted`. The backend
    /// applies the same rule to its own copy of the task.
    #[must_use]
    pub fn next_on_submit(self) -> TaskStatus {
        match self {
            TaskStatus::Submitted | TaskStatus::Resubmitted | TaskStatus::Redo => {
                TaskStatus::Resubmitted
            }
            TaskStatus::Live | TaskStatus::Checked | TaskStatus::Locked => TaskStatus::Submitted,
        }
    }

    /// Whether the task counts toward the weekly completion total.
    #[must_use]
    pub fn counts_as_completed(self) -> bool {
        matches!(
            self,
            TaskStatus::Submitted | TaskStatus::Resubmitted | TaskStatus::Checked
        )
    }

    /// Whether a new submission may be opened for a task in this status.
    #[must_use]
    pub fn accepts_submission(self) -> bool {
        !matches!(self, TaskStatus::Checked | TaskStatus::Locked)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Live => "Live",
            TaskStatus::Submitted => "Submitted",
            TaskStatus::Resubmitted => "Resubmitted",
            TaskStatus::Redo => "Redo",
            TaskStatus::Checked => "Checked",
            TaskStatus::Locked => "Locked",
        }
    }
}

/// Free-function form of [`TaskStatus::next_on_submit`].
#[must_use]
pub fn next_status_on_submit(current: TaskStatus) -> TaskStatus {
    current.next_on_submit()
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StatusParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StatusParseError::Unknown(raw.to_string()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handed_in_statuses_resubmit() {
        for status in [
            TaskStatus::Submitted,
            TaskStatus::Resubmitted,
            TaskStatus::Redo,
        ] {
            assert_eq!(next_status_on_submit(status), TaskStatus::Resubmitted);
        }
    }

    #[test]
    fn other_statuses_submit() {
        for status in [TaskStatus::Live, TaskStatus::Locked, TaskStatus::Checked] {
            assert_eq!(next_status_on_submit(status), TaskStatus::Submitted);
        }
    }

    #[test]
    fn completion_set_is_submitted_resubmitted_checked() {
        let completed: Vec<_> = TaskStatus::ALL
            .into_iter()
            .filter(|s| s.counts_as_completed())
            .collect();
        assert_eq!(
            completed,
            vec![
                TaskStatus::Submitted,
                TaskStatus::Resubmitted,
                TaskStatus::Checked
            ]
        );
    }

    #[test]
    fn parses_wire_strings_loosely() {
        assert_eq!(" redo ".parse::<TaskStatus>().unwrap(), TaskStatus::Redo);
        assert_eq!("Checked".parse::<TaskStatus>().unwrap(), TaskStatus::Checked);
        let err = "Pending".parse::<TaskStatus>().unwrap_err();
        assert!(matches!(err, StatusParseError::Unknown(ref s) if s == "Pending"));
    }

    #[test]
    fn checked_and_locked_refuse_submission() {
        assert!(!TaskStatus::Checked.accepts_submission());
        assert!(!TaskStatus::Locked.accepts_submission());
        assert!(TaskStatus::Redo.accepts_submission());
    }
}
