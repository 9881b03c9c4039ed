use serde::{Deserialize, Serialize};
use serde_json::Value;

use redshift_core::model::TaskStatus;

use super::TaskSubmission;
use crate::error::GatewayError;

pub(crate) const STATUS_SUCCESS: &str = "success";
pub(crate) const STATUS_ERROR: &str = "error";

/// Request body; the `action` field selects the backend operation.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub(crate) enum GatewayRequest<'a> {
    Login {
        name: &'a str,
        passcode: &'a str,
    },
    Submit {
        #[serde(rename = "taskId")]
        task_id: &'a str,
        content: &'a str,
        #[serde(rename = "studentName")]
        student_name: &'a str,
        #[serde(rename = "taskTitle")]
        task_title: &'a str,
    },
}

impl<'a> GatewayRequest<'a> {
    pub(crate) fn login(name: &'a str, passcode: &'a str) -> Self {
        Self::Login { name, passcode }
    }

    pub(crate) fn submit(submission: &'a TaskSubmission) -> Self {
        Self::Submit {
            task_id: submission.task_id.as_str(),
            content: &submission.content,
            student_name: &submission.student_name,
            task_title: &submission.task_title,
        }
    }
}

/// Response envelope shared by both actions. Fields are loosely typed.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GatewayResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, rename = "newStatus")]
    pub new_status: Option<Value>,
}

impl GatewayResponse {
    pub(crate) fn parse(body: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(body).map_err(|err| GatewayError::Malformed(err.to_string()))
    }

    pub(crate) fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    pub(crate) fn is_error(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ERROR)
    }

    pub(crate) fn message_text(&self) -> String {
        match &self.message {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::from("no message"),
        }
    }

    /// Interpret the response to a submit request.
    pub(crate) fn into_submitted_status(self) -> Result<TaskStatus, GatewayError> {
        if self.is_error() {
            return Err(GatewayError::Rejected(self.message_text()));
        }
        match &self.new_status {
            Some(Value::String(raw)) => raw
                .parse()
                .map_err(|err| GatewayError::Malformed(format!("newStatus: {err}"))),
            Some(other) => Err(GatewayError::Malformed(format!(
                "newStatus is not a string: {other}"
            ))),
            None => Err(GatewayError::Malformed("missing newStatus".into())),
        }
    }
}
