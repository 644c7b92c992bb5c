use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WaitlistError>;

/// Which piece of contact-source configuration is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingConfig {
    /// No API key, so there is no client at all.
    Credential,
    /// Client exists but no audience to read from or write to.
    Audience,
}

impl MissingConfig {
    pub fn env_var(&self) -> &'static str {
        match self {
            MissingConfig::Credential => "RESEND_API_KEY",
            MissingConfig::Audience => "RESEND_AUDIENCE_ID",
        }
    }
}

impl fmt::Display for MissingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

#[derive(Error, Debug)]
pub enum WaitlistError {
    #[error("{0} is not configured")]
    Unconfigured(MissingConfig),

    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{email} is already on the waitlist")]
    Conflict { email: String },

    #[error("Contact source error: {message}")]
    Transport { status: Option<u16>, message: String },
}

impl WaitlistError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WaitlistError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
