mod api;
mod middleware;
mod scheduler;
mod store;

use std::sync::Arc;

use kapper_cluster::{MarkerLayer, ZoomThresholdTable};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RequestBudget,
    store::ProviderStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(kapper_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let table = match &config.zoom_table_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading zoom table");
            ZoomThresholdTable::load(path)?
        }
        None => ZoomThresholdTable::default(),
    };
    let layer = Arc::new(MarkerLayer::new(table, kapper_cluster::ClusterSplitter::default()));

    let store = ProviderStore::open(config.providers_path.clone()).await?;

    let _scheduler = scheduler::build_scheduler(store.clone(), &config.refresh_cron).await?;

    let budget = RequestBudget::per_minute(config.rate_limit_per_minute);
    let app = build_app(AppState { store, layer }, budget);

    tracing::info!(addr = %config.bind_addr, env = %config.env, "kapper-server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
