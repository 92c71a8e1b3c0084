/**
 * VIGIE KERNEL - Point d'entrée du dashboard
 *
 * RÔLE : charge .env + vigie.yaml, vérifie la config base, assemble
 * source MySQL + horloge + cache dans un Dashboard, puis sert les pages.
 *
 * Une config incomplète est fatale : on sort avant d'ouvrir le port HTTP.
 */

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vigie_kernel::config::load_config;
use vigie_kernel::health::HealthTracker;
use vigie_kernel::http::{build_router, AppState};
use vigie_kernel::{Dashboard, MySqlEventSource, RowFormatter, SystemClock};

#[tokio::main]
async fn main() {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = load_config().await.context("configuration")?;
    info!(
        db_host = %cfg.database.host,
        db_name = %cfg.database.name,
        excluded_service_id = cfg.dashboard.excluded_service_id,
        "configuration loaded"
    );

    let source = Arc::new(MySqlEventSource::new(&cfg.database, cfg.dashboard.excluded_service_id));
    let dashboard = Dashboard::new(
        source,
        Arc::new(SystemClock),
        RowFormatter::new(cfg.dashboard.utc_offset),
    );

    let app_state = AppState {
        dashboard: Arc::new(dashboard),
        health_tracker: HealthTracker::new(),
    };
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
