use std::sync::Arc;

use anyhow::Context;
use presocial_dash::charts::{SubjectPalette, Theme};
use presocial_dash::config::DashboardConfig;
use presocial_dash::dashboard::Dashboard;
use presocial_dash::server;
use presocial_dash::storage::SessionTable;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "presocial_dash=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let config = DashboardConfig::default();
    info!(path = %config.data_path().display(), "Loading session table");

    let table = SessionTable::load_parquet(config.data_path())
        .with_context(|| format!("loading {}", config.data_path().display()))?;
    let dashboard = Dashboard::build(&table, &SubjectPalette::default(), Theme::default())
        .context("building dashboard")?;

    server::serve(&config, Arc::new(dashboard))
        .await
        .context("serving dashboard")?;
    Ok(())
}
