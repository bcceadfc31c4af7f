use crate::{DbPool, Error, Pool};
use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn build_pool(database_url: &str, max_open: u64) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    Pool::builder().max_open(max_open).build(manager)
}

/// Applies pending migrations. The migration harness is synchronous, so it runs
/// on a blocking thread through the async connection wrapper.
pub async fn run_migrations(database_url: String) -> Result<(), Error> {
    tokio::task::spawn_blocking(move || {
        let mut connection =
            AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)?;

        let applied = connection.run_pending_migrations(MIGRATIONS)?;
        info!("Applied {} pending migrations.", applied.len());

        Ok::<(), Error>(())
    })
    .await?
}
