use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::banner::{BannerRepository, BannerService, MemoryBannerRepository, SeaOrmBannerRepository};
use service::validation::HttpHtmlValidator;

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.server.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.server.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

fn validator_base_url(cfg: &configs::AppConfig) -> String {
    env::var("VALIDATOR_URL").unwrap_or_else(|_| cfg.validator.base_url.clone())
}

/// Pick the banner repository: SeaORM over the configured database when a
/// URL is present (running migrations first), in-memory otherwise.
async fn build_repository(
    cfg: &configs::AppConfig,
) -> anyhow::Result<Arc<dyn BannerRepository>> {
    let url = models::db::DATABASE_URL
        .clone()
        .or_else(|| cfg.database.url.clone());
    match url {
        Some(url) => {
            let db = models::db::connect_with_config(&url, &cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            info!("connected to database");
            Ok(Arc::new(SeaOrmBannerRepository::new(db)))
        }
        None => {
            info!("no database configured, using in-memory banner store");
            Ok(Arc::new(MemoryBannerRepository::new()))
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::load_default().unwrap_or_default();

    let validator = Arc::new(HttpHtmlValidator::new(validator_base_url(&cfg))?);
    let repo = build_repository(&cfg).await?;
    let state = ServerState { banners: Arc::new(BannerService::new(repo, validator)) };

    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting banner api server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
