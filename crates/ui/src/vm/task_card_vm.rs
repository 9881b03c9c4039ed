use redshift_core::model::{Task, TaskId, TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkVm {
    pub href: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskCardVm {
    pub id: TaskId,
    /// Upper-cased id shown in the avatar; `None` for locked tasks, which show a lock.
    pub badge: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub status_label: String,
    pub expandable: bool,
    pub hint: Option<String>,
    pub action_label: Option<String>,
    pub completed: bool,
    pub reference_links: Vec<LinkVm>,
    pub learning_materials: Vec<String>,
}

/// Link text without its `http://` or `https://` scheme.
#[must_use]
pub fn display_link(link: &str) -> &str {
    link.strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .unwrap_or(link)
}

fn hint_for(status: TaskStatus) -> Option<&'static str> {
    match status {
        TaskStatus::Locked => None,
        TaskStatus::Checked => Some("This task has been verified by your educator."),
        TaskStatus::Submitted => Some("Waiting for review. You can update your submission."),
        TaskStatus::Live | TaskStatus::Resubmitted | TaskStatus::Redo => {
            Some("Ready for submission?")
        }
    }
}

fn action_for(status: TaskStatus) -> Option<&'static str> {
    match status {
        TaskStatus::Checked | TaskStatus::Locked => None,
        TaskStatus::Submitted => Some("Resubmit"),
        TaskStatus::Live | TaskStatus::Resubmitted | TaskStatus::Redo => {
            Some("Submit Assignment")
        }
    }
}

#[must_use]
pub fn map_task_card(task: &Task) -> TaskCardVm {
    let locked = task.status == TaskStatus::Locked;
    TaskCardVm {
        id: task.id.clone(),
        badge: (!locked).then(|| task.id.as_str().to_uppercase()),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        status_label: task.status.as_str().to_uppercase(),
        expandable: !locked,
        hint: hint_for(task.status).map(str::to_string),
        action_label: action_for(task.status).map(str::to_string),
        completed: task.status == TaskStatus::Checked,
        reference_links: task
            .reference_links
            .iter()
            .map(|href| LinkVm {
                href: href.clone(),
                text: display_link(href).to_string(),
            })
            .collect(),
        learning_materials: task.learning_materials.clone(),
    }
}

#[must_use]
pub fn map_task_cards(tasks: &[Task]) -> Vec<TaskCardVm> {
    tasks.iter().map(map_task_card).collect()
}
