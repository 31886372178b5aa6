// darkroom_service/src/db/mod.rs

//! Postgres implementations of the order store and the profile directory.

pub mod orders;
pub mod profiles;
pub mod rows;

pub use orders::PgOrderStore;
pub use profiles::PgProfileDirectory;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .max_connections(10)
    .acquire_timeout(Duration::from_secs(5))
    .connect(database_url)
    .await
}

pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
  sqlx::migrate!("./migrations").run(pool).await
}
