use redshift_core::model::{CourseProgress, WEEKS_PER_MONTH, percent_of};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarSize {
    Small,
    Medium,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressBarVm {
    pub label: String,
    pub sub_label: String,
    /// Fill in percent, already clamped to `0..=100`.
    pub percent: f64,
    pub size: BarSize,
}

/// Weekly tasks, monthly goals and course completion, in display order.
#[must_use]
pub fn map_progress_bars(progress: &CourseProgress) -> Vec<ProgressBarVm> {
    vec![
        ProgressBarVm {
            label: format!("Week {}", progress.week),
            sub_label: format!(
                "{}/{} Tasks",
                progress.weekly_tasks_completed, progress.total_weekly_tasks
            ),
            percent: progress.weekly_percent(),
            size: BarSize::Medium,
        },
        ProgressBarVm {
            label: format!("Month {}", progress.month),
            sub_label: "Monthly Goals".to_string(),
            percent: percent_of(progress.week_in_month(), WEEKS_PER_MONTH),
            size: BarSize::Medium,
        },
        ProgressBarVm {
            label: "Course Completion".to_string(),
            sub_label: format!("{}%", progress.course_percent()),
            percent: percent_of(progress.week, progress.total_weeks),
            size: BarSize::Small,
        },
    ]
}
