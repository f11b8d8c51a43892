// core/src/checkout/context.rs

//! Data shared by the checkout steps of one `create_order` run.

use crate::barcode::BarcodeSource;
use crate::config::EngineConfig;
use crate::model::{Address, AddressId, BuyerId, Caller, CatalogEntry, CheckoutItem, Order, OrderId, OrderItem, ProductId};
use crate::notify::NotificationDispatcher;
use crate::store::{AddressBook, Catalog, OrderStore};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Collaborator handles the steps reach through the context.
#[derive(Clone)]
pub struct CheckoutDeps {
  pub catalog: Arc<dyn Catalog>,
  pub addresses: Arc<dyn AddressBook>,
  pub orders: Arc<dyn OrderStore>,
  pub barcodes: Arc<dyn BarcodeSource>,
  pub notifications: Option<NotificationDispatcher>,
  pub config: EngineConfig,
}

pub struct CheckoutCtxData {
  pub deps: CheckoutDeps,

  // Request
  pub caller: Caller,
  pub buyer_id: BuyerId,
  pub address_id: Option<AddressId>,
  pub items: Vec<CheckoutItem>,

  // Filled in by the steps, in order
  pub order_id: OrderId,
  pub address: Option<Address>,
  pub catalog: HashMap<ProductId, CatalogEntry>,
  pub order_items: Vec<OrderItem>,
  pub total_amount: Decimal,
  pub order: Option<Order>,
}

impl CheckoutCtxData {
  pub fn new(
    deps: CheckoutDeps,
    caller: Caller,
    buyer_id: BuyerId,
    address_id: Option<AddressId>,
    items: Vec<CheckoutItem>,
  ) -> Self {
    Self {
      deps,
      caller,
      buyer_id,
      address_id,
      items,
      order_id: uuid::Uuid::new_v4(),
      address: None,
      catalog: HashMap::new(),
      order_items: Vec::new(),
      total_amount: Decimal::ZERO,
      order: None,
    }
  }
}
