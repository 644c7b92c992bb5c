use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use waitlist_common::{email::email_domain, validate_email, MissingConfig, WaitlistError};

use super::NOT_CONFIGURED_MESSAGE;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckParams {
    email: Option<String>,
}

/// Attach `details` only when the environment allows diagnostics.
fn with_details(mut body: Value, state: &AppState, details: impl Into<Value>) -> Value {
    if state.expose_details() {
        if let Some(map) = body.as_object_mut() {
            map.insert("details".to_string(), details.into());
        }
    }
    body
}

fn error_response(state: &AppState, err: WaitlistError) -> Response {
    match err {
        WaitlistError::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid email address",
                "details": [{ "field": field, "message": message }],
            })),
        )
            .into_response(),
        WaitlistError::Unconfigured(MissingConfig::Credential) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": NOT_CONFIGURED_MESSAGE })),
        )
            .into_response(),
        WaitlistError::Unconfigured(MissingConfig::Audience) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "RESEND_AUDIENCE_ID is not configured. Please set it in your environment variables.",
                "message": "To use the waitlist feature, you need to create an Audience in Resend dashboard and set RESEND_AUDIENCE_ID.",
            })),
        )
            .into_response(),
        WaitlistError::Conflict { email } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "This email is already on the waitlist",
                "email": email,
            })),
        )
            .into_response(),
        WaitlistError::Transport { status, message } => {
            error!(status = ?status, error = %message, "Resend API error");
            let body = json!({
                "error": "Failed to add email to waitlist. Please try again later.",
            });
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(with_details(body, state, message)),
            )
                .into_response()
        }
    }
}

async fn submit(state: &AppState, raw_email: &str) -> Result<String, WaitlistError> {
    // Validate before touching the source.
    let email = validate_email(raw_email)?;
    let (source, audience_id) = state.audience().map_err(WaitlistError::Unconfigured)?;
    source.create_contact(audience_id, &email).await?;
    Ok(email)
}

pub async fn api_submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(Json(body)) => body,
        // Well-formed JSON of the wrong shape, e.g. `{"email": 5}`.
        Err(JsonRejection::JsonDataError(rejection)) => {
            warn!(error = %rejection, "Waitlist request with non-string email");
            return error_response(
                &state,
                WaitlistError::validation("email", "Email must be a string"),
            );
        }
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable waitlist request");
            let body = json!({ "error": "Invalid request" });
            return (
                StatusCode::BAD_REQUEST,
                Json(with_details(body, &state, rejection.body_text())),
            )
                .into_response();
        }
    };

    let raw_email = body.email.unwrap_or_default();
    match submit(&state, &raw_email).await {
        Ok(email) => {
            info!(domain = email_domain(&email), "Waitlist signup");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Successfully added to waitlist",
                    "email": email,
                })),
            )
                .into_response()
        }
        Err(e) => {
            if let WaitlistError::Conflict { email } = &e {
                info!(domain = email_domain(email), "Duplicate waitlist signup");
            }
            error_response(&state, e)
        }
    }
}

/// Existence lookup. Resend has no lookup-by-email endpoint, so this always
/// answers `exists: false`.
pub async fn api_check(Query(params): Query<CheckParams>) -> impl IntoResponse {
    match params.email.filter(|e| !e.is_empty()) {
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email parameter is required" })),
        ),
        Some(_) => (
            StatusCode::OK,
            Json(json!({
                "exists": false,
                "message": "Email check not implemented. Use POST to add email.",
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waitlist_common::{Environment, SiteConfig};

    fn state(environment: Environment) -> AppState {
        AppState {
            source: None,
            audience_id: None,
            environment,
            site: SiteConfig::default(),
        }
    }

    #[test]
    fn details_hidden_in_production() {
        let body = with_details(json!({"error": "x"}), &state(Environment::Production), "boom");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn details_shown_in_development() {
        let body = with_details(json!({"error": "x"}), &state(Environment::Development), "boom");
        assert_eq!(body["details"], "boom");
    }

    #[tokio::test]
    async fn invalid_email_checked_before_configuration() {
        let err = submit(&state(Environment::Development), "not-an-email")
            .await
            .unwrap_err();
        assert!(matches!(err, WaitlistError::Validation { .. }));
    }

    #[tokio::test]
    async fn valid_email_without_key_is_unconfigured() {
        let err = submit(&state(Environment::Development), "a@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, WaitlistError::Unconfigured(MissingConfig::Credential)));
    }
}
