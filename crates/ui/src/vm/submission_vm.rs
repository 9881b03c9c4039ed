use redshift_core::model::{SubmissionDraft, Task, TaskId};

pub const SUBMISSION_PLACEHOLDER: &str =
    "Paste your work link, reflection, or code snippet here...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionModalVm {
    pub task_id: TaskId,
    pub task_title: String,
    pub placeholder: &'static str,
    pub confirm_label: &'static str,
    pub can_confirm: bool,
}

/// Modal state for the targeted task while the student types `text`.
#[must_use]
pub fn map_submission_modal(task: &Task, text: &str, submitting: bool) -> SubmissionModalVm {
    SubmissionModalVm {
        task_id: task.id.clone(),
        task_title: task.title.clone(),
        placeholder: SUBMISSION_PLACEHOLDER,
        confirm_label: if submitting {
            "Sending..."
        } else {
            "Confirm Submission"
        },
        can_confirm: !submitting && SubmissionDraft::new(text).is_ok(),
    }
}
