//! The contact source seam: where contacts come from and go to.
//!
//! Handlers only see [`ContactSource`]. Production wires in the Resend
//! client; tests substitute an in-memory double.

use async_trait::async_trait;
use resend_client::{CreateContactRequest, ResendClient, ResendError};
use waitlist_common::{Contact, Result, WaitlistError};

#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Full snapshot of an audience. Never cached.
    async fn list_contacts(&self, audience_id: &str) -> Result<Vec<Contact>>;

    /// Add one address. Uniqueness is the source's job: duplicates come back
    /// as [`WaitlistError::Conflict`].
    async fn create_contact(&self, audience_id: &str, email: &str) -> Result<()>;
}

#[async_trait]
impl ContactSource for ResendClient {
    async fn list_contacts(&self, audience_id: &str) -> Result<Vec<Contact>> {
        let contacts = ResendClient::list_contacts(self, audience_id)
            .await
            .map_err(|e| classify(e, None))?;

        Ok(contacts
            .into_iter()
            .map(|c| Contact {
                id: c.id,
                email: c.email,
                created_at: c.created_at,
            })
            .collect())
    }

    async fn create_contact(&self, audience_id: &str, email: &str) -> Result<()> {
        ResendClient::create_contact(self, audience_id, &CreateContactRequest::new(email))
            .await
            .map_err(|e| classify(e, Some(email)))?;
        Ok(())
    }
}

/// Map a vendor error onto the waitlist taxonomy. Only creation can conflict.
fn classify(err: ResendError, email: Option<&str>) -> WaitlistError {
    match email {
        Some(email) if err.is_already_exists() => WaitlistError::Conflict {
            email: email.to_string(),
        },
        _ => WaitlistError::Transport {
            status: err.status(),
            message: err.to_string(),
        },
    }
}
