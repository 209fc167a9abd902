use anyhow::{anyhow, Context};
use axum::Router;
use tracing::*;

use eventa::config::{self, AppCfg, StoreKind};
use eventa::middleware::cors::CorsExt;
use eventa::models::Seed;
use eventa::services::memory::PostServiceMem;
use eventa::services::posts::PostServiceDb;
use eventa::{db, routes};

async fn postgres_app(cfg: &AppCfg) -> anyhow::Result<Router> {
    let url = cfg
        .database_url
        .as_deref()
        .ok_or(anyhow!("database_url is required for the postgres store"))?;

    if cfg.run_migrations {
        db::run_migrations(url).await?;
    }
    let pool = db::pool(url, cfg.db_pool_size)?;
    Ok(routes::app(PostServiceDb::new(pool)))
}

fn memory_app(cfg: &AppCfg) -> anyhow::Result<Router> {
    let svc = PostServiceMem::new();
    if let Some(path) = &cfg.seed_file {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let seed: Seed = serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
        info!(users = seed.users.len(), events = seed.events.len(), "seeding memory store");
        svc.seed(seed);
    }
    warn!("using the in-memory store; data is lost on exit");
    Ok(routes::app(svc))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::tracing::init();

    let cfg = AppCfg::load()?;

    let app = match cfg.store {
        StoreKind::Postgres => postgres_app(&cfg).await?,
        StoreKind::Memory => memory_app(&cfg)?,
    }
    .with_cors(&cfg.cors_origins)?;

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    info!("starting listening at {}", cfg.listen_addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
