pub mod submit;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use waitlist_common::{
    query::{bucket_count, run_list_query},
    ListQuery, MissingConfig, Pagination, SortField, SortOrder, WaitlistError, WaitlistStats,
};

use crate::AppState;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Resend is not configured. Please set RESEND_API_KEY in your environment variables.";
pub const AUDIENCE_NOT_CONFIGURED_MESSAGE: &str = "RESEND_AUDIENCE_ID is not configured";

// --- Query structs ---

/// Raw list parameters. Unparseable values fall back to defaults rather than
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    search: Option<String>,
    page: Option<String>,
    limit: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl From<ListParams> for ListQuery {
    fn from(params: ListParams) -> Self {
        let defaults = ListQuery::default();
        ListQuery {
            search: params.search.unwrap_or_default(),
            page: params
                .page
                .as_deref()
                .and_then(parse_count)
                .unwrap_or(defaults.page),
            limit: params
                .limit
                .as_deref()
                .and_then(parse_count)
                .unwrap_or(defaults.limit),
            sort_by: params
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .unwrap_or(defaults.sort_by),
            sort_order: params
                .sort_order
                .as_deref()
                .and_then(SortOrder::parse)
                .unwrap_or(defaults.sort_order),
        }
        .normalized()
    }
}

// --- Helpers ---

/// Parse a non-negative count. All-digit values too large for `usize`
/// saturate, so a huge page still lands past the end.
fn parse_count(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => Some(usize::MAX),
        Err(_) => None,
    }
}

/// Status and message for a read endpoint that cannot reach its audience.
/// A missing key is a 503; a missing audience still answers 200.
fn degraded(missing: MissingConfig) -> (StatusCode, &'static str) {
    match missing {
        MissingConfig::Credential => (StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED_MESSAGE),
        MissingConfig::Audience => (StatusCode::OK, AUDIENCE_NOT_CONFIGURED_MESSAGE),
    }
}

fn empty_list(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "data": [],
            "pagination": Pagination::empty(),
        })),
    )
        .into_response()
}

fn empty_stats(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "stats": WaitlistStats::default(),
        })),
    )
        .into_response()
}

// --- Handlers ---

pub async fn api_list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let query = ListQuery::from(params);

    let (source, audience_id) = match state.audience() {
        Ok(pair) => pair,
        Err(missing) => {
            let (status, message) = degraded(missing);
            return empty_list(status, message);
        }
    };

    match source.list_contacts(audience_id).await {
        Ok(contacts) => Json(run_list_query(contacts, &query, Utc::now())).into_response(),
        Err(e) => {
            log_fetch_failure(&e, "list");
            empty_list(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch emails")
        }
    }
}

pub async fn api_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (source, audience_id) = match state.audience() {
        Ok(pair) => pair,
        Err(missing) => {
            let (status, message) = degraded(missing);
            return empty_stats(status, message);
        }
    };

    match source.list_contacts(audience_id).await {
        Ok(contacts) => {
            let stats = bucket_count(&contacts, Utc::now());
            Json(serde_json::json!({ "stats": stats })).into_response()
        }
        Err(e) => {
            log_fetch_failure(&e, "stats");
            empty_stats(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch stats")
        }
    }
}

fn log_fetch_failure(err: &WaitlistError, endpoint: &'static str) {
    match err {
        WaitlistError::Transport { status, message } => {
            warn!(endpoint, status = ?status, error = %message, "Failed to fetch contacts");
        }
        other => warn!(endpoint, error = %other, "Failed to fetch contacts"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let qs: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let uri: axum::http::Uri = format!("/?{}", qs.join("&")).parse().unwrap();
        Query::<ListParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn defaults_when_absent() {
        let q = ListQuery::from(ListParams::default());
        assert_eq!(q, ListQuery::default());
        assert_eq!(q.sort_by, SortField::CreatedAt);
        assert_eq!(q.sort_order, SortOrder::Desc);
        assert_eq!(q.limit, 50);
    }

    #[test]
    fn parses_camel_case_params() {
        let q = ListQuery::from(params(&[
            ("search", "acme"),
            ("page", "3"),
            ("limit", "10"),
            ("sortBy", "email"),
            ("sortOrder", "asc"),
        ]));
        assert_eq!(q.search, "acme");
        assert_eq!(q.page, 3);
        assert_eq!(q.limit, 10);
        assert_eq!(q.sort_by, SortField::Email);
        assert_eq!(q.sort_order, SortOrder::Asc);
    }

    #[test]
    fn garbage_values_fall_back() {
        let q = ListQuery::from(params(&[
            ("page", "abc"),
            ("limit", "-4"),
            ("sortBy", "id"),
            ("sortOrder", "up"),
        ]));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 50);
        assert_eq!(q.sort_by, SortField::CreatedAt);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn overflowing_counts_saturate() {
        let q = ListQuery::from(params(&[
            ("page", "99999999999999999999999"),
            ("limit", "99999999999999999999999"),
        ]));
        assert_eq!(q.page, usize::MAX);
        assert_eq!(q.limit, waitlist_common::MAX_LIMIT);
        assert_eq!(parse_count("12a"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn page_zero_is_clamped() {
        let q = ListQuery::from(params(&[("page", "0"), ("limit", "0")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn missing_key_is_unavailable_missing_audience_is_ok() {
        assert_eq!(degraded(MissingConfig::Credential).0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(degraded(MissingConfig::Audience).0, StatusCode::OK);
    }
}
