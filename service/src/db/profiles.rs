// darkroom_service/src/db/profiles.rs

use async_trait::async_trait;
use darkroom::services::{CustomerProfile, ProfileDirectory};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgProfileDirectory {
  pool: PgPool,
}

impl PgProfileDirectory {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
  #[instrument(name = "PgProfileDirectory::lookup", skip(self))]
  async fn lookup(&self, owner_id: Uuid) -> anyhow::Result<Option<CustomerProfile>> {
    let row: Option<(String, Option<String>)> =
      sqlx::query_as("SELECT display_name, company FROM customer_profiles WHERE user_id = $1")
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
    Ok(row.map(|(display_name, company)| CustomerProfile { display_name, company }))
  }
}
