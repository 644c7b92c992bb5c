use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use waitlist_api::{build_router, AppState};
use waitlist_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("waitlist=info".parse()?)
                .add_directive("resend_client=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    if let Some(missing) = config.missing_resend_config() {
        warn!(%missing, "Resend not fully configured; waitlist endpoints will run degraded");
    }

    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Waitlist API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
