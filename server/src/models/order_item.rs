// server/src/models/order_item.rs

use chrono::{DateTime, Utc};
use order_settlement::model::{ItemOptions, OrderItem};
use order_settlement::CompletedItem;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub total_price: Decimal,
  pub vendor_id: Option<Uuid>,
  pub options: Json<ItemOptions>,
  pub uploaded_file_url: Option<String>,
}

pub const ORDER_ITEM_COLUMNS: &str = "i.id, i.order_id, i.product_id, i.product_name, i.quantity, \
   i.unit_price, i.total_price, i.vendor_id, i.options, i.uploaded_file_url";

impl From<OrderItemRow> for OrderItem {
  fn from(row: OrderItemRow) -> Self {
    OrderItem {
      id: row.id,
      order_id: row.order_id,
      product_id: row.product_id,
      product_name: row.product_name,
      quantity: row.quantity,
      unit_price: row.unit_price,
      total_price: row.total_price,
      vendor_id: row.vendor_id,
      options: row.options.0,
      uploaded_file_url: row.uploaded_file_url,
    }
  }
}

/// An item joined with the order fields a settlement statement shows.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedItemRow {
  pub barcode: String,
  pub order_created_at: DateTime<Utc>,
  #[sqlx(flatten)]
  pub item: OrderItemRow,
}

impl From<CompletedItemRow> for CompletedItem {
  fn from(row: CompletedItemRow) -> Self {
    CompletedItem {
      barcode: row.barcode,
      order_created_at: row.order_created_at,
      item: row.item.into(),
    }
  }
}
