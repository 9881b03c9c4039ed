use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;

use redshift_core::model::{DashboardSnapshot, TaskStatus};

use super::normalize::normalize_login_payload;
use super::wire::{GatewayRequest, GatewayResponse};
use super::{RemoteGateway, TaskSubmission};
use crate::error::GatewayError;

/// Plain text keeps the Apps Script endpoint from requiring a CORS preflight.
const REQUEST_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

/// Gateway for the Apps Script web app that fronts the course spreadsheet.
///
/// Every request is a POST of one JSON object; redirects to the script's
/// content host are followed.
#[derive(Clone)]
pub struct SheetGateway {
    client: Client,
    endpoint: Url,
}

impl SheetGateway {
    /// Build a gateway whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, request: &GatewayRequest<'_>) -> Result<GatewayResponse, GatewayError> {
        let body =
            serde_json::to_string(request).map_err(|err| GatewayError::Malformed(err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, REQUEST_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::HttpStatus(response.status()));
        }

        let text = response.text().await?;
        GatewayResponse::parse(&text)
    }
}

#[async_trait]
impl RemoteGateway for SheetGateway {
    async fn login(
        &self,
        name: &str,
        passcode: &str,
    ) -> Result<Option<DashboardSnapshot>, GatewayError> {
        debug!(student = %name, "login request");
        let response = self.post(&GatewayRequest::login(name, passcode)).await?;

        if !response.is_success() {
            info!(student = %name, message = %response.message_text(), "login rejected by backend");
            return Ok(None);
        }

        let data = response
            .data
            .ok_or_else(|| GatewayError::Malformed("login success without data".into()))?;
        let snapshot = normalize_login_payload(&data);
        debug!(
            student = %snapshot.student().name,
            tasks = snapshot.tasks().len(),
            "login accepted"
        );
        Ok(Some(snapshot))
    }

    async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskStatus, GatewayError> {
        debug!(task = %submission.task_id, "submit request");
        let response = self.post(&GatewayRequest::submit(submission)).await?;
        let status = response.into_submitted_status().inspect_err(|err| {
            warn!(task = %submission.task_id, error = %err, "submit not confirmed");
        })?;
        debug!(task = %submission.task_id, %status, "submit confirmed");
        Ok(status)
    }
}
