use redshift_core::model::{Credentials, LoginDraft, sanitize_passcode};
use services::DashboardError;

/// Login form state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginVm {
    draft: LoginDraft,
    error: Option<String>,
    loading: bool,
}

impl LoginVm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Stores the passcode with non-digits removed and at most four digits kept.
    pub fn set_passcode(&mut self, raw: &str) {
        self.draft.passcode = sanitize_passcode(raw);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.draft.name
    }

    #[must_use]
    pub fn passcode(&self) -> &str {
        &self.draft.passcode
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.loading && self.draft.is_submittable()
    }

    #[must_use]
    pub fn button_label(&self) -> &'static str {
        if self.loading {
            "Verifying..."
        } else {
            "Enter Mission Control"
        }
    }

    /// Starts a login attempt, clearing the previous error.
    ///
    /// Returns `None` while an attempt is running or the form is invalid.
    pub fn begin(&mut self) -> Option<Credentials> {
        if self.loading {
            return None;
        }
        let credentials = self.draft.clone().validate().ok()?;
        self.error = None;
        self.loading = true;
        Some(credentials)
    }

    /// Records how the attempt started by [`Self::begin`] ended.
    pub fn finish(&mut self, result: &Result<(), DashboardError>) {
        self.loading = false;
        self.error = result
            .as_ref()
            .err()
            .map(|err| err.user_message().to_string());
    }
}
