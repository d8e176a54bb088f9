use std::sync::Arc;

use anyhow::Context;

use frontdesk_api::{app, config::FrontdeskConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frontdesk_observability::init();

    let config = FrontdeskConfig::from_env();
    let controller = Arc::new(app::build_controller(&config));
    tracing::debug!(?controller, "controller ready");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app::build_app(controller))
        .await
        .context("server terminated")?;

    Ok(())
}
