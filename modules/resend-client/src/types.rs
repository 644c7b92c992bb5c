use serde::{Deserialize, Serialize};

/// A contact as returned by `GET /audiences/{id}/contacts`.
/// Every field is optional; older audiences omit `created_at`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Contact {
    pub id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Option<String>,
    pub unsubscribed: Option<bool>,
}

/// Body for `POST /audiences/{id}/contacts`. The waitlist only collects
/// the address.
#[derive(Debug, Clone, Serialize)]
pub struct CreateContactRequest {
    pub email: String,
}

impl CreateContactRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Response to a successful contact creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedContact {
    pub object: Option<String>,
    pub id: String,
}

/// List envelope: `{"object": "list", "data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub object: Option<String>,
    #[serde(default)]
    pub data: Vec<T>,
}

/// Error body Resend returns with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub name: Option<String>,
    pub message: String,
}
