use thiserror::Error;

pub const MIN_NAME_LEN: usize = 3;
pub const PASSCODE_LEN: usize = 4;

//
// ─── LOGIN ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoginDraftError {
    #[error("name must be at least 3 characters")]
    NameTooShort,
    #[error("passcode must be exactly 4 digits")]
    InvalidPasscode,
}

/// Raw login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginDraft {
    pub name: String,
    pub passcode: String,
}

/// Login input that passed form validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    name: String,
    passcode: String,
}

impl LoginDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, passcode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passcode: passcode.into(),
        }
    }

    /// Validate the form input.
    ///
    /// # Errors
    ///
    /// Returns `LoginDraftError::NameTooShort` if the name has fewer than
    /// three characters, `LoginDraftError::InvalidPasscode` unless the
    /// passcode is exactly four ASCII digits. The name is kept as typed.
    pub fn validate(self) -> Result<Credentials, LoginDraftError> {
        if self.name.chars().count() < MIN_NAME_LEN {
            return Err(LoginDraftError::NameTooShort);
        }
        if self.passcode.len() != PASSCODE_LEN
            || !self.passcode.chars().all(|c| c.is_ascii_digit())
        {
            return Err(LoginDraftError::InvalidPasscode);
        }
        Ok(Credentials {
            name: self.name,
            passcode: self.passcode,
        })
    }

    /// Whether the submit button should be enabled for this input.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        self.clone().validate().is_ok()
    }
}

impl Credentials {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn passcode(&self) -> &str {
        &self.passcode
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("passcode", &"****")
            .finish()
    }
}

/// Keeps only digits and at most four of them, as the passcode field does while typing.
#[must_use]
pub fn sanitize_passcode(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PASSCODE_LEN)
        .collect()
}

//
// ─── SUBMISSION ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionDraftError {
    #[error("submission text cannot be empty")]
    Empty,
}

/// Submitted work: a link, reflection or code snippet. Never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft(String);

impl SubmissionDraft {
    /// Wrap submission text; it is sent as typed, not trimmed.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionDraftError::Empty` if the text is only whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, SubmissionDraftError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SubmissionDraftError::Empty);
        }
        Ok(Self(text))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
