mod dashboard_vm;
mod login_vm;
mod progress_vm;
mod submission_vm;
mod task_card_vm;
mod time_fmt;

pub use dashboard_vm::{DashboardVm, Screen, map_screen};
pub use login_vm::LoginVm;
pub use progress_vm::{BarSize, ProgressBarVm, map_progress_bars};
pub use submission_vm::{SubmissionModalVm, map_submission_modal};
pub use task_card_vm::{LinkVm, TaskCardVm, display_link, map_task_card, map_task_cards};
pub use time_fmt::format_date_line;
