use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;

use crate::config::Config;

pub mod postgres_repo;

pub async fn create_postgres_pool(
    config: &Config,
) -> anyhow::Result<Pool<PostgresConnectionManager<NoTls>>> {
    let manager = PostgresConnectionManager::new_from_stringlike(
        config.postgres_connection_string(),
        NoTls,
    )
    .context("Invalid postgres connection configuration")?;

    Pool::builder()
        .build(manager)
        .await
        .context("Failed to build postgres connection pool")
}
