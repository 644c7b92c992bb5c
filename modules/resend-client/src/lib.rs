pub mod error;
pub mod types;

pub use error::{ResendError, Result};
pub use types::{Contact, CreateContactRequest, CreatedContact, ErrorBody, ListResponse};

const BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Point the client at a different host (self-hosted proxy, local test server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch every contact in an audience.
    pub async fn list_contacts(&self, audience_id: &str) -> Result<Vec<Contact>> {
        let url = format!("{}/audiences/{}/contacts", self.base_url, audience_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let list: ListResponse<Contact> = resp.json().await?;
        tracing::debug!(audience_id, count = list.data.len(), "Fetched Resend contacts");
        Ok(list.data)
    }

    /// Add a contact to an audience. Duplicates surface as `ResendError::Api`
    /// (see [`ResendError::is_already_exists`]).
    pub async fn create_contact(
        &self,
        audience_id: &str,
        request: &CreateContactRequest,
    ) -> Result<CreatedContact> {
        let url = format!("{}/audiences/{}/contacts", self.base_url, audience_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let created: CreatedContact = resp.json().await?;
        tracing::debug!(audience_id, contact_id = %created.id, "Created Resend contact");
        Ok(created)
    }
}

/// Turn a non-2xx response into `ResendError::Api`, preferring the `message`
/// field of Resend's JSON error body over the raw text.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => body,
    };
    Err(ResendError::Api {
        status: status.as_u16(),
        message,
    })
}
