use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use postboard::{Config, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("error reading configuration")?;
    info!(?config, "configuration");

    app::run(config).await.context("server error")?;

    Ok(())
}
