use serde::{Deserialize, Serialize};

use crate::model::task::{Task, count_completed};

pub const DEFAULT_WEEK: u32 = 1;
pub const DEFAULT_MONTH: u32 = 1;
pub const DEFAULT_TOTAL_WEEKS: u32 = 12;
pub const DEFAULT_TOTAL_MONTHS: u32 = 3;

/// Weeks that make up one monthly goal block.
pub const WEEKS_PER_MONTH: u32 = 4;

/// Course position plus weekly completion counters.
///
/// `weekly_tasks_completed` and `total_weekly_tasks` are derived from the
/// task list; build them through [`CourseProgress::derive`] or
/// [`CourseProgress::recount`] rather than setting them by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub week: u32,
    pub month: u32,
    pub total_weeks: u32,
    pub total_months: u32,
    pub weekly_tasks_completed: u32,
    pub total_weekly_tasks: u32,
}

impl Default for CourseProgress {
    fn default() -> Self {
        Self {
            week: DEFAULT_WEEK,
            month: DEFAULT_MONTH,
            total_weeks: DEFAULT_TOTAL_WEEKS,
            total_months: DEFAULT_TOTAL_MONTHS,
            weekly_tasks_completed: 0,
            total_weekly_tasks: 0,
        }
    }
}

impl CourseProgress {
    /// Builds progress for a course position with counters taken from `tasks`.
    #[must_use]
    pub fn derive(
        week: u32,
        month: u32,
        total_weeks: u32,
        total_months: u32,
        tasks: &[Task],
    ) -> Self {
        Self {
            week,
            month,
            total_weeks,
            total_months,
            weekly_tasks_completed: 0,
            total_weekly_tasks: 0,
        }
        .recount(tasks)
    }

    /// Returns a copy with both task counters recomputed from `tasks`.
    #[must_use]
    pub fn recount(self, tasks: &[Task]) -> Self {
        Self {
            weekly_tasks_completed: count_completed(tasks),
            total_weekly_tasks: u32::try_from(tasks.len()).unwrap_or(u32::MAX),
            ..self
        }
    }

    /// Weekly completion in percent, clamped to `0..=100`.
    #[must_use]
    pub fn weekly_percent(&self) -> f64 {
        percent_of(self.weekly_tasks_completed, self.total_weekly_tasks)
    }

    /// Position of the current week inside its monthly block, `1..=4`.
    #[must_use]
    pub fn week_in_month(&self) -> u32 {
        match self.week % WEEKS_PER_MONTH {
            0 => WEEKS_PER_MONTH,
            rem => rem,
        }
    }

    /// Course completion as a rounded whole percentage.
    #[must_use]
    pub fn course_percent(&self) -> u32 {
        if self.total_weeks == 0 {
            return 0;
        }
        let ratio = f64::from(self.week) / f64::from(self.total_weeks) * 100.0;
        // Values are bounded by u32 inputs, rounding is the only lossy step.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = ratio.round() as u32;
        rounded
    }
}

/// `value / max` in percent, clamped to `0..=100`; a zero `max` yields 0.
#[must_use]
pub fn percent_of(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(max) * 100.0).clamp(0.0, 100.0)
}
