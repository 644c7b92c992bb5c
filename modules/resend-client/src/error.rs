use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResendError>;

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ResendError {
    /// HTTP status reported by the API, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Resend answers a duplicate contact with 422 and/or an "already exists" message.
    pub fn is_already_exists(&self) -> bool {
        match self {
            ResendError::Api { status, message } => {
                *status == 422 || message.to_lowercase().contains("already exists")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ResendError {
    fn from(err: reqwest::Error) -> Self {
        ResendError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ResendError {
    fn from(err: serde_json::Error) -> Self {
        ResendError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprocessable_is_duplicate() {
        let err = ResendError::Api {
            status: 422,
            message: "validation_error".into(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn already_exists_message_is_duplicate() {
        let err = ResendError::Api {
            status: 400,
            message: "Contact Already Exists in audience".into(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn other_api_errors_are_not_duplicates() {
        let err = ResendError::Api {
            status: 401,
            message: "API key is invalid".into(),
        };
        assert!(!err.is_already_exists());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn network_error_has_no_status() {
        let err = ResendError::Network("connection refused".into());
        assert!(!err.is_already_exists());
        assert_eq!(err.status(), None);
    }
}
