use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mailtrap_forward::config::Config;
use mailtrap_forward::dispatch::HttpDispatcher;
use mailtrap_forward::server::Server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mailtrap_forward=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    tracing::info!("mail forwarder for {} started", config.send_base_url);

    let dispatcher = Arc::new(HttpDispatcher::new(reqwest::Client::new()));
    let server = Server::bind(&config, dispatcher).await?;
    tracing::info!("Listening on: {}", server.local_addr()?);

    server.serve().await
}
