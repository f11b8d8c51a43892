// server/src/db/pg_store.rs

//! PostgreSQL implementation of the engine's store traits, using runtime
//! (non-macro) sqlx queries.

use crate::models::order::ORDER_COLUMNS;
use crate::models::order_item::ORDER_ITEM_COLUMNS;
use crate::models::{AddressRow, CatalogRow, CompletedItemRow, OrderItemRow, OrderRow, VendorRow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use order_settlement::model::{AddressId, BuyerId, OrderId, OrderItem, ProductId, VendorId};
use order_settlement::store::StoreResult;
use order_settlement::{
  Address, AddressBook, Catalog, CatalogEntry, CompletedItem, Order, OrderStatus, OrderStore, StoreError, Vendor,
  VendorStore,
};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{error, instrument};
use uuid::Uuid;

const BARCODE_CONSTRAINT: &str = "orders_barcode_key";

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn items_for(&self, order_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<OrderItem>>> {
    let rows: Vec<OrderItemRow> = sqlx::query_as(&format!(
      "SELECT {} FROM order_items i WHERE i.order_id = ANY($1) ORDER BY i.order_id, i.position",
      ORDER_ITEM_COLUMNS
    ))
    .bind(order_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in rows {
      grouped.entry(row.order_id).or_default().push(row.into());
    }
    Ok(grouped)
  }

  async fn hydrate(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut items = self.items_for(&ids).await?;
    rows
      .into_iter()
      .map(|row| {
        let order_items = items.remove(&row.id).unwrap_or_default();
        row.into_order(order_items)
      })
      .collect()
  }

  async fn hydrate_one(&self, row: Option<OrderRow>) -> StoreResult<Option<Order>> {
    match row {
      Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }
}

fn backend(e: sqlx::Error) -> StoreError {
  error!(error = %e, "Database operation failed.");
  StoreError::backend(e)
}

fn is_barcode_violation(e: &sqlx::Error) -> bool {
  match e {
    sqlx::Error::Database(db) => db.is_unique_violation() && db.constraint() == Some(BARCODE_CONSTRAINT),
    _ => false,
  }
}

#[async_trait]
impl Catalog for PgStore {
  #[instrument(name = "PgStore::resolve_products", skip(self), fields(count = product_ids.len()))]
  async fn resolve_products(&self, product_ids: &[ProductId]) -> StoreResult<HashMap<ProductId, CatalogEntry>> {
    let rows: Vec<CatalogRow> = sqlx::query_as(
      "SELECT p.id AS product_id, p.name, v.id AS vendor_id, v.is_blocked AS vendor_is_blocked \
       FROM products p LEFT JOIN vendors v ON v.id = p.vendor_id \
       WHERE p.id = ANY($1)",
    )
    .bind(product_ids)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;

    Ok(
      rows
        .into_iter()
        .map(|row| (row.product_id, CatalogEntry::from(row)))
        .collect(),
    )
  }
}

#[async_trait]
impl AddressBook for PgStore {
  async fn find_address(&self, buyer_id: BuyerId, address_id: AddressId) -> StoreResult<Option<Address>> {
    let row: Option<AddressRow> = sqlx::query_as(
      "SELECT id, buyer_id, recipient, line1, city, postal_code, country \
       FROM addresses WHERE id = $1 AND buyer_id = $2",
    )
    .bind(address_id)
    .bind(buyer_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    Ok(row.map(Address::from))
  }
}

#[async_trait]
impl OrderStore for PgStore {
  async fn barcode_exists(&self, barcode: &str) -> StoreResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE barcode = $1)")
      .bind(barcode)
      .fetch_one(&self.pool)
      .await
      .map_err(backend)?;
    Ok(exists)
  }

  #[instrument(name = "PgStore::insert_order", skip(self, order), fields(order_id = %order.id, barcode = %order.barcode))]
  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    let mut tx = self.pool.begin().await.map_err(backend)?;

    let inserted = sqlx::query(
      "INSERT INTO orders (id, barcode, buyer_id, address_id, total_amount, status, payment_status, \
       shipping_carrier, tracking_number, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(order.id)
    .bind(&order.barcode)
    .bind(order.buyer_id)
    .bind(order.address_id)
    .bind(order.total_amount)
    .bind(order.status.as_str())
    .bind(order.payment_status.as_str())
    .bind(&order.shipping_carrier)
    .bind(&order.tracking_number)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *tx)
    .await;

    if let Err(e) = inserted {
      // Dropping the transaction rolls it back.
      if is_barcode_violation(&e) {
        return Err(StoreError::DuplicateBarcode {
          barcode: order.barcode.clone(),
        });
      }
      return Err(backend(e));
    }

    for (position, item) in order.items.iter().enumerate() {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, position, product_id, product_name, quantity, unit_price, \
         total_price, vendor_id, options, uploaded_file_url) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
      )
      .bind(item.id)
      .bind(order.id)
      .bind(position as i32)
      .bind(item.product_id)
      .bind(&item.product_name)
      .bind(item.quantity)
      .bind(item.unit_price)
      .bind(item.total_price)
      .bind(item.vendor_id)
      .bind(Json(&item.options))
      .bind(&item.uploaded_file_url)
      .execute(&mut *tx)
      .await
      .map_err(backend)?;
    }

    tx.commit().await.map_err(|e| {
      if is_barcode_violation(&e) {
        StoreError::DuplicateBarcode {
          barcode: order.barcode.clone(),
        }
      } else {
        backend(e)
      }
    })
  }

  async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(backend)?;
    self.hydrate_one(row).await
  }

  async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!("SELECT {} FROM orders WHERE barcode = $1", ORDER_COLUMNS))
      .bind(barcode)
      .fetch_optional(&self.pool)
      .await
      .map_err(backend)?;
    self.hydrate_one(row).await
  }

  async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(status.as_str())
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    self.hydrate_one(row).await
  }

  async fn update_tracking(
    &self,
    order_id: OrderId,
    carrier: Option<String>,
    tracking_number: Option<String>,
  ) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> = sqlx::query_as(&format!(
      "UPDATE orders SET shipping_carrier = $2, tracking_number = $3, updated_at = now() \
       WHERE id = $1 RETURNING {}",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .bind(carrier)
    .bind(tracking_number)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    self.hydrate_one(row).await
  }

  async fn list_orders(&self, buyer_id: Option<BuyerId>) -> StoreResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
      "SELECT {} FROM orders WHERE ($1::uuid IS NULL OR buyer_id = $1) ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .bind(buyer_id)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    self.hydrate(rows).await
  }

  #[instrument(name = "PgStore::completed_vendor_items", skip(self))]
  async fn completed_vendor_items(
    &self,
    vendor_id: VendorId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> StoreResult<Vec<CompletedItem>> {
    let rows: Vec<CompletedItemRow> = sqlx::query_as(&format!(
      "SELECT o.barcode, o.created_at AS order_created_at, {} \
       FROM order_items i JOIN orders o ON o.id = i.order_id \
       WHERE i.vendor_id = $1 AND o.status = $2 \
         AND ($3::timestamptz IS NULL OR o.created_at >= $3) \
         AND ($4::timestamptz IS NULL OR o.created_at < $4) \
       ORDER BY o.created_at, o.barcode, i.position",
      ORDER_ITEM_COLUMNS
    ))
    .bind(vendor_id)
    .bind(OrderStatus::Completed.as_str())
    .bind(from)
    .bind(to)
    .fetch_all(&self.pool)
    .await
    .map_err(backend)?;
    Ok(rows.into_iter().map(CompletedItem::from).collect())
  }
}

const VENDOR_COLUMNS: &str = "id, name, commission_rate, balance, is_blocked";

#[async_trait]
impl VendorStore for PgStore {
  async fn find_vendor(&self, vendor_id: VendorId) -> StoreResult<Option<Vendor>> {
    let row: Option<VendorRow> = sqlx::query_as(&format!("SELECT {} FROM vendors WHERE id = $1", VENDOR_COLUMNS))
      .bind(vendor_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(backend)?;
    Ok(row.map(Vendor::from))
  }

  async fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
    let rows: Vec<VendorRow> = sqlx::query_as(&format!("SELECT {} FROM vendors ORDER BY name", VENDOR_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(backend)?;
    Ok(rows.into_iter().map(Vendor::from).collect())
  }

  async fn set_commission_rate(&self, vendor_id: VendorId, rate: Decimal) -> StoreResult<Option<Vendor>> {
    let row: Option<VendorRow> = sqlx::query_as(&format!(
      "UPDATE vendors SET commission_rate = $2 WHERE id = $1 RETURNING {}",
      VENDOR_COLUMNS
    ))
    .bind(vendor_id)
    .bind(rate)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    Ok(row.map(Vendor::from))
  }

  async fn set_blocked(&self, vendor_id: VendorId, blocked: bool) -> StoreResult<Option<Vendor>> {
    let row: Option<VendorRow> = sqlx::query_as(&format!(
      "UPDATE vendors SET is_blocked = $2 WHERE id = $1 RETURNING {}",
      VENDOR_COLUMNS
    ))
    .bind(vendor_id)
    .bind(blocked)
    .fetch_optional(&self.pool)
    .await
    .map_err(backend)?;
    Ok(row.map(Vendor::from))
  }
}
