mod drafts;
mod progress;
mod snapshot;
mod status;
mod task;

pub use drafts::{
    Credentials, LoginDraft, LoginDraftError, MIN_NAME_LEN, PASSCODE_LEN, SubmissionDraft,
    SubmissionDraftError, sanitize_passcode,
};
pub use progress::{
    CourseProgress, DEFAULT_MONTH, DEFAULT_TOTAL_MONTHS, DEFAULT_TOTAL_WEEKS, DEFAULT_WEEK,
    WEEKS_PER_MONTH, percent_of,
};
pub use snapshot::{DEFAULT_TOPIC, DashboardSnapshot, Student, UNKNOWN_COHORT, UNKNOWN_STUDENT};
pub use status::{StatusParseError, TaskStatus, next_status_on_submit};
pub use task::{Task, TaskId, count_completed};
