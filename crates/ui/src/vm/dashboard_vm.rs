use chrono::{DateTime, Utc};

use redshift_core::model::DashboardSnapshot;
use services::DashboardPhase;

use super::progress_vm::{ProgressBarVm, map_progress_bars};
use super::task_card_vm::{TaskCardVm, map_task_cards};
use super::time_fmt::format_date_line;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardVm {
    pub greeting_name: String,
    pub cohort: String,
    pub date_line: String,
    pub current_focus: String,
    pub progress_bars: Vec<ProgressBarVm>,
    pub week_badge: String,
    pub tasks: Vec<TaskCardVm>,
}

impl DashboardVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &DashboardSnapshot, today: DateTime<Utc>) -> Self {
        let progress = snapshot.progress();
        Self {
            greeting_name: snapshot.student().name.clone(),
            cohort: snapshot.student().cohort.clone(),
            date_line: format_date_line(today),
            current_focus: snapshot.current_topic().to_string(),
            progress_bars: map_progress_bars(progress),
            week_badge: format!("Week {} of {}", progress.week, progress.total_weeks),
            tasks: map_task_cards(snapshot.tasks()),
        }
    }
}

/// Which top-level screen to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Loading,
    Login,
    Dashboard(DashboardVm),
}

#[must_use]
pub fn map_screen(phase: &DashboardPhase, today: DateTime<Utc>) -> Screen {
    match phase {
        DashboardPhase::CheckingSession => Screen::Loading,
        DashboardPhase::Unauthenticated => Screen::Login,
        DashboardPhase::Authenticated(snapshot) => {
            Screen::Dashboard(DashboardVm::from_snapshot(snapshot, today))
        }
    }
}
