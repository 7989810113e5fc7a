use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::AuthConfig;
use service::email::{ConsoleGateway, NotificationGateway, SmtpGateway};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Without SMTP settings the server still runs; codes are written to the
/// log instead of mailed, which is what local development wants.
fn build_gateway(cfg: &configs::EmailConfig) -> anyhow::Result<Arc<dyn NotificationGateway>> {
    if cfg.smtp_configured() {
        Ok(Arc::new(SmtpGateway::new(cfg)?))
    } else {
        warn!("smtp not configured, falling back to console delivery");
        Ok(Arc::new(ConsoleGateway))
    }
}

/// Public entry: migrate, build the app, and serve. The binary loads and
/// validates the configuration and installs the logging subscriber before
/// handing over.
pub async fn run(cfg: configs::AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with(&cfg.database).await?;
    Migrator::up(&db, None).await?;
    info!("database migrated");

    let gateway = build_gateway(&cfg.email)?;
    let state = AppState {
        db,
        auth: AuthConfig::from_app_config(&cfg),
        gateway,
    };

    let app: Router = routes::build_router(state, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting accounts api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
