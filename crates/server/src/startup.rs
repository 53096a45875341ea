use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::geo::IpApiClient;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::auth::{repo::seaorm::SeaOrmUserRepository, CredentialHasher, TokenManager};
use service::company::repo::seaorm::SeaOrmCompanyRepository;
use service::origin::{AllowAll, CountryAllowList, OriginPolicy};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

fn build_origin_policy(cfg: &AppConfig) -> Result<Arc<dyn OriginPolicy>, StartupError> {
    if !cfg.origin.enabled {
        return Ok(Arc::new(AllowAll));
    }
    let lookup = IpApiClient::new(&cfg.origin.lookup_url, Duration::from_secs(cfg.origin.lookup_timeout_secs))
        .map_err(|e| StartupError::InvalidConfig(format!("geo client: {e}")))?;
    info!(countries = ?cfg.origin.allowed_countries, "origin allow-list enabled");
    Ok(Arc::new(CountryAllowList::new(lookup, cfg.origin.allowed_countries.clone())))
}

/// Wire repositories, services and policies from configuration.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let tokens = TokenManager::new(
        cfg.auth.signing_key.as_deref(),
        Duration::from_secs(cfg.auth.access_token_ttl_secs),
    )
    .map_err(StartupError::SigningKey)?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await.map_err(anyhow::Error::from)?;
    info!("migrations applied");

    Ok(ServerState::new(
        Arc::new(SeaOrmUserRepository { db: db.clone() }),
        Arc::new(SeaOrmCompanyRepository { db }),
        Arc::new(tokens),
        CredentialHasher::new(),
        build_origin_policy(cfg)?,
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}

/// Build the app from an already validated configuration and serve it
/// until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg)?;
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors(), Duration::from_secs(cfg.server.request_timeout_secs));

    info!(%addr, "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_uses_configured_host_and_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 8089;
        assert_eq!(bind_addr(&cfg).unwrap(), SocketAddr::from(([127, 0, 0, 1], 8089)));
    }

    #[test]
    fn bind_addr_rejects_unparseable_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn run_fails_fast_without_signing_key() {
        let mut cfg = AppConfig::default();
        cfg.auth.signing_key = None;
        assert!(run(cfg).await.is_err());
    }
}
