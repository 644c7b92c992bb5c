//! HTTP surface for the waitlist: signup, dashboard list and stats.

pub mod rest;
pub mod source;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::Json,
    routing::get,
    Router,
};
use resend_client::ResendClient;
use tower_http::set_header::SetResponseHeaderLayer;
use waitlist_common::{Config, Environment, MissingConfig, SiteConfig};

use source::ContactSource;

pub struct AppState {
    /// `None` when no API key is configured.
    pub source: Option<Arc<dyn ContactSource>>,
    pub audience_id: Option<String>,
    pub environment: Environment,
    pub site: SiteConfig,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let source = config.resend_api_key.clone().map(|key| {
            let client = match &config.resend_base_url {
                Some(base) => ResendClient::with_base_url(key, base.clone()),
                None => ResendClient::new(key),
            };
            Arc::new(client) as Arc<dyn ContactSource>
        });

        Self {
            source,
            audience_id: config.resend_audience_id.clone(),
            environment: config.environment,
            site: config.site.clone(),
        }
    }

    /// The source and audience to talk to, or which of the two is missing.
    pub fn audience(&self) -> Result<(&dyn ContactSource, &str), MissingConfig> {
        let source = self.source.as_deref().ok_or(MissingConfig::Credential)?;
        let audience_id = self.audience_id.as_deref().ok_or(MissingConfig::Audience)?;
        Ok((source, audience_id))
    }

    /// Diagnostic detail is only exposed outside production.
    pub fn expose_details(&self) -> bool {
        !self.environment.is_production()
    }
}

async fn site_info(State(state): State<Arc<AppState>>) -> Json<SiteConfig> {
    Json(state.site.clone())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route("/api/site", get(site_info))
        // Waitlist
        .route(
            "/api/waitlist",
            get(rest::submit::api_check).post(rest::submit::api_submit),
        )
        .route("/api/waitlist/list", get(rest::api_list))
        .route("/api/waitlist/stats", get(rest::api_stats))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Dashboard data is always fetched fresh
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method + path only: query strings can carry email addresses
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
