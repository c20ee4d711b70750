use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ConfigSource, ServerConfig};
use migration::MigratorTrait;
use service::users::SeaOrmUserService;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes;
use crate::state::ServerState;
use crate::views::Views;

/// Prefer the config file; only a missing file falls back to
/// `SERVER_HOST`/`SERVER_PORT`/`DATABASE_URL`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let (cfg, source) = AppConfig::load_or_env()?;
    if source == ConfigSource::Env {
        warn!(path = %configs::config_path(), "config file not found, using environment");
    }
    Ok(cfg)
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Connect the database, apply migrations when enabled and assemble the state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    let views = Views::new()?;
    Ok(ServerState::new(Arc::new(SeaOrmUserService::new(db)), Arc::new(views)))
}

/// Serve `app` until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // 无法安装信号处理时不退出，交由进程外部终止
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app from an already loaded config and serve it
/// until Ctrl+C. Logging and `.env` are the caller's job.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state);

    let addr = bind_addr(&cfg.server)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "starting server");
    serve(listener, app, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
