// darkroom_service/src/db/orders.rs

use super::rows::{cents_to_db, count_to_db, enum_to_db, OrderAddOnRow, OrderRow};
use anyhow::Context;
use async_trait::async_trait;
use darkroom::models::{Order, OrderAddOn, OrderRecord, OrderStatus, PaymentStatus, UploadedAsset};
use darkroom::services::OrderStore;
use darkroom::StoreError;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

const ORDER_COLUMNS: &str = "id, order_number, owner_id, package, package_name, package_unit_price_cents, \
  photo_type, file_count, image_count, bracketing, express, subtotal_cents, discount_cents, total_price_cents, \
  coupon_code, contact_email, company_name, object_reference, special_requests, terms_accepted, \
  settlement_method, status, payment_flow_status, payment_status, created_at";

/// Postgres-backed order store. Order and add-on rows share one transaction.
#[derive(Clone)]
pub struct PgOrderStore {
  pool: PgPool,
}

impl PgOrderStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn map_sqlx_error(error: sqlx::Error, operation: &str) -> StoreError {
  if let sqlx::Error::Database(db_error) = &error {
    let code = db_error.code();
    match code.as_deref() {
      // 23505: unique violation, only possible on the order number
      Some("23505") => {
        warn!(error = %db_error, operation, "Order number collision.");
        return StoreError::Duplicate(db_error.message().to_string());
      }
      // 23503: foreign key violation against customer_profiles
      Some("23503") if db_error.constraint() == Some("orders_owner_id_fkey") => {
        warn!(error = %db_error, operation, "Order owner has no customer profile.");
        return StoreError::IncompleteProfile(db_error.message().to_string());
      }
      _ => {}
    }
  }
  error!(error = %error, operation, "Order store operation failed.");
  StoreError::Backend(anyhow::Error::new(error).context(operation.to_string()))
}

#[async_trait]
impl OrderStore for PgOrderStore {
  #[instrument(name = "PgOrderStore::create_order", skip_all, fields(order_number = %order.order_number))]
  async fn create_order(&self, order: &Order, add_ons: &[OrderAddOn]) -> Result<(), StoreError> {
    let bracketing = order.bracketing.map(Json);
    let mut tx = self
      .pool
      .begin()
      .await
      .map_err(|e| map_sqlx_error(e, "begin transaction"))?;

    sqlx::query(&format!(
      "INSERT INTO orders ({ORDER_COLUMNS}) VALUES \
       ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)"
    ))
    .bind(order.id)
    .bind(&order.order_number)
    .bind(order.owner_id)
    .bind(enum_to_db(&order.package)?)
    .bind(&order.package_name)
    .bind(cents_to_db(order.package_unit_price_cents)?)
    .bind(enum_to_db(&order.photo_type)?)
    .bind(count_to_db(order.file_count)?)
    .bind(count_to_db(order.image_count)?)
    .bind(bracketing)
    .bind(order.express)
    .bind(cents_to_db(order.subtotal_cents)?)
    .bind(cents_to_db(order.discount_cents)?)
    .bind(cents_to_db(order.total_price_cents)?)
    .bind(&order.coupon_code)
    .bind(&order.contact_email)
    .bind(&order.company_name)
    .bind(&order.object_reference)
    .bind(&order.special_requests)
    .bind(order.terms_accepted)
    .bind(enum_to_db(&order.settlement_method)?)
    .bind(enum_to_db(&order.status)?)
    .bind(enum_to_db(&order.payment_flow_status)?)
    .bind(enum_to_db(&order.payment_status)?)
    .bind(order.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_sqlx_error(e, "insert order"))?;

    for add_on in add_ons {
      sqlx::query(
        "INSERT INTO order_add_ons (id, order_id, extra, name, unit_price_cents) VALUES ($1, $2, $3, $4, $5)",
      )
      .bind(add_on.id)
      .bind(add_on.order_id)
      .bind(enum_to_db(&add_on.extra)?)
      .bind(&add_on.name)
      .bind(cents_to_db(add_on.unit_price_cents)?)
      .execute(&mut *tx)
      .await
      .map_err(|e| map_sqlx_error(e, "insert order add-on"))?;
    }

    tx.commit().await.map_err(|e| map_sqlx_error(e, "commit order"))?;
    info!(order_id = %order.id, add_ons = add_ons.len(), "Order committed.");
    Ok(())
  }

  #[instrument(name = "PgOrderStore::find_by_number", skip(self))]
  async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>, StoreError> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"))
      .bind(order_number)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| map_sqlx_error(e, "select order"))?;
    let Some(row) = row else {
      return Ok(None);
    };

    let add_on_rows: Vec<OrderAddOnRow> = sqlx::query_as(
      "SELECT id, order_id, extra, name, unit_price_cents FROM order_add_ons WHERE order_id = $1 ORDER BY extra",
    )
    .bind(row.id)
    .fetch_all(&self.pool)
    .await
    .map_err(|e| map_sqlx_error(e, "select order add-ons"))?;

    let order = Order::try_from(row).context("decoding order row")?;
    let add_ons = add_on_rows
      .into_iter()
      .map(OrderAddOn::try_from)
      .collect::<anyhow::Result<Vec<_>>>()
      .context("decoding order add-on rows")?;
    Ok(Some(OrderRecord { order, add_ons }))
  }

  #[instrument(name = "PgOrderStore::record_asset", skip_all, fields(order_id = %asset.order_id, asset = %asset.name))]
  async fn record_asset(&self, asset: &UploadedAsset) -> Result<(), StoreError> {
    sqlx::query(
      "INSERT INTO order_assets (id, order_id, kind, name, size_bytes, mime_type, storage_key) \
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(asset.id)
    .bind(asset.order_id)
    .bind(enum_to_db(&asset.kind)?)
    .bind(&asset.name)
    .bind(i64::try_from(asset.size_bytes).context("asset size does not fit in BIGINT")?)
    .bind(&asset.mime_type)
    .bind(&asset.storage_key)
    .execute(&self.pool)
    .await
    .map_err(|e| map_sqlx_error(e, "insert order asset"))?;
    Ok(())
  }

  #[instrument(name = "PgOrderStore::update_status", skip(self))]
  async fn update_status(
    &self,
    order_number: &str,
    status: OrderStatus,
    payment_status: PaymentStatus,
  ) -> Result<bool, StoreError> {
    let result = sqlx::query("UPDATE orders SET status = $2, payment_status = $3 WHERE order_number = $1")
      .bind(order_number)
      .bind(enum_to_db(&status)?)
      .bind(enum_to_db(&payment_status)?)
      .execute(&self.pool)
      .await
      .map_err(|e| map_sqlx_error(e, "update order status"))?;
    Ok(result.rows_affected() > 0)
  }
}
