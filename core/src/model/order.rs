// core/src/model/order.rs

use super::{AddressId, BuyerId, ItemOptions, OrderId, ProductId, VendorId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
  Pending,
  Processing,
  Shipped,
  Completed,
  Cancelled,
  Returned,
  Refunded,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 7] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
    OrderStatus::Returned,
    OrderStatus::Refunded,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "PENDING",
      OrderStatus::Processing => "PROCESSING",
      OrderStatus::Shipped => "SHIPPED",
      OrderStatus::Completed => "COMPLETED",
      OrderStatus::Cancelled => "CANCELLED",
      OrderStatus::Returned => "RETURNED",
      OrderStatus::Refunded => "REFUNDED",
    }
  }

  /// Cancelled, returned and refunded orders sit outside the fulfillment bar.
  pub fn is_side_branch(self) -> bool {
    matches!(self, OrderStatus::Cancelled | OrderStatus::Returned | OrderStatus::Refunded)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| format!("unknown order status '{}'", s))
  }
}

/// Recorded for the payment collaborator; never changed by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
  AwaitingPayment,
  Paid,
  Failed,
  Refunded,
}

impl PaymentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      PaymentStatus::AwaitingPayment => "AWAITING_PAYMENT",
      PaymentStatus::Paid => "PAID",
      PaymentStatus::Failed => "FAILED",
      PaymentStatus::Refunded => "REFUNDED",
    }
  }
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PaymentStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "AWAITING_PAYMENT" => Ok(PaymentStatus::AwaitingPayment),
      "PAID" => Ok(PaymentStatus::Paid),
      "FAILED" => Ok(PaymentStatus::Failed),
      "REFUNDED" => Ok(PaymentStatus::Refunded),
      other => Err(format!("unknown payment status '{}'", other)),
    }
  }
}

/// One catalog line of an order, frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: OrderId,
  pub product_id: ProductId,
  pub product_name: String,
  pub quantity: i32,
  pub unit_price: Decimal,
  pub total_price: Decimal,
  /// Seller of record at sale time; `None` means the platform sold it.
  pub vendor_id: Option<VendorId>,
  pub options: ItemOptions,
  pub uploaded_file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  pub barcode: String,
  pub buyer_id: BuyerId,
  pub address_id: AddressId,
  pub total_amount: Decimal,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  pub shipping_carrier: Option<String>,
  pub tracking_number: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub items: Vec<OrderItem>,
}

impl Order {
  pub fn items_total(&self) -> Decimal {
    self.items.iter().map(|item| item.total_price).sum()
  }
}
