use std::time::Duration;

use anyhow::anyhow;
use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::deadpool::{Hook, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn pool(database_url: &str, max_size: usize) -> anyhow::Result<Pool<AsyncPgConnection>> {
    let mgr = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    info!(max_size, "Starting DB pool");
    let pool = Pool::builder(mgr)
        .max_size(max_size)
        .wait_timeout(Some(Duration::from_secs(5)))
        .post_create(Hook::async_fn(|_conn, metrics| {
            tracing::trace!(?metrics, "db connection created");
            Box::pin(std::future::ready(Ok(())))
        }))
        .runtime(deadpool::Runtime::Tokio1)
        .build()?;
    Ok(pool)
}

/// Apply pending embedded migrations on a dedicated blocking connection.
pub async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut conn = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("migrations failed: {e}"))?;
        info!(applied = applied.len(), "migrations up to date");
        Ok(())
    })
    .await?
}
