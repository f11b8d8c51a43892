// core/src/store/mod.rs

//! Collaborator traits the engine talks to. Implementations must be safe to
//! share across concurrent requests.

pub mod memory;

use crate::error::StoreError;
use crate::model::{
  Address, AddressId, BuyerId, CatalogEntry, Order, OrderId, OrderItem, OrderStatus, ProductId, Vendor, VendorId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use memory::InMemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// An order item together with the order fields settlement needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedItem {
  pub barcode: String,
  pub order_created_at: DateTime<Utc>,
  pub item: OrderItem,
}

#[async_trait]
pub trait Catalog: Send + Sync {
  /// Resolves each known product. Unknown ids are simply absent from the map.
  async fn resolve_products(&self, product_ids: &[ProductId]) -> StoreResult<HashMap<ProductId, CatalogEntry>>;
}

#[async_trait]
pub trait AddressBook: Send + Sync {
  /// Returns the address only when it belongs to `buyer_id`.
  async fn find_address(&self, buyer_id: BuyerId, address_id: AddressId) -> StoreResult<Option<Address>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn barcode_exists(&self, barcode: &str) -> StoreResult<bool>;

  /// Persists the order and all of its items in one atomic unit.
  ///
  /// Fails with `StoreError::DuplicateBarcode` when the barcode is taken, in
  /// which case nothing was written.
  async fn insert_order(&self, order: &Order) -> StoreResult<()>;

  async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>>;

  /// Exact, case-sensitive match.
  async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Order>>;

  /// Returns the updated order, or `None` when it does not exist.
  async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<Option<Order>>;

  async fn update_tracking(
    &self,
    order_id: OrderId,
    carrier: Option<String>,
    tracking_number: Option<String>,
  ) -> StoreResult<Option<Order>>;

  /// Newest first. `None` lists every buyer's orders.
  async fn list_orders(&self, buyer_id: Option<BuyerId>) -> StoreResult<Vec<Order>>;

  /// Items sold by `vendor_id` on COMPLETED orders created in `[from, to)`.
  async fn completed_vendor_items(
    &self,
    vendor_id: VendorId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> StoreResult<Vec<CompletedItem>>;
}

#[async_trait]
pub trait VendorStore: Send + Sync {
  async fn find_vendor(&self, vendor_id: VendorId) -> StoreResult<Option<Vendor>>;

  async fn list_vendors(&self) -> StoreResult<Vec<Vendor>>;

  async fn set_commission_rate(&self, vendor_id: VendorId, rate: Decimal) -> StoreResult<Option<Vendor>>;

  async fn set_blocked(&self, vendor_id: VendorId, blocked: bool) -> StoreResult<Option<Vendor>>;
}

/// Outbound sink for order events (email, webhooks, ...).
#[async_trait]
pub trait OrderNotifier: Send + Sync {
  async fn order_created(&self, order: &Order) -> anyhow::Result<()>;
}
