// server/src/models/order.rs

use chrono::{DateTime, Utc};
use order_settlement::model::OrderItem;
use order_settlement::{Order, OrderStatus, PaymentStatus, StoreError};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

// Statuses are stored as their wire names in TEXT columns (see the CHECK
// constraints in the migration).
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: Uuid,
  pub barcode: String,
  pub buyer_id: Uuid,
  pub address_id: Uuid,
  pub total_amount: Decimal,
  pub status: String,
  pub payment_status: String,
  pub shipping_carrier: Option<String>,
  pub tracking_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub const ORDER_COLUMNS: &str = "id, barcode, buyer_id, address_id, total_amount, status, payment_status, \
   shipping_carrier, tracking_number, created_at, updated_at";

impl OrderRow {
  pub fn into_order(self, items: Vec<OrderItem>) -> Result<Order, StoreError> {
    let status = self
      .status
      .parse::<OrderStatus>()
      .map_err(|e| StoreError::backend(anyhow::anyhow!("order {}: {}", self.id, e)))?;
    let payment_status = self
      .payment_status
      .parse::<PaymentStatus>()
      .map_err(|e| StoreError::backend(anyhow::anyhow!("order {}: {}", self.id, e)))?;
    Ok(Order {
      id: self.id,
      barcode: self.barcode,
      buyer_id: self.buyer_id,
      address_id: self.address_id,
      total_amount: self.total_amount,
      status,
      payment_status,
      shipping_carrier: self.shipping_carrier,
      tracking_number: self.tracking_number,
      created_at: self.created_at,
      updated_at: self.updated_at,
      items,
    })
  }
}
