// core/src/engine.rs

//! `Engine`: every service of the crate wired against one backend.

use crate::barcode::{BarcodeSource, RandomBarcodes};
use crate::checkout::{CheckoutDeps, CheckoutService};
use crate::config::EngineConfig;
use crate::error::SettlementResult;
use crate::fulfillment::FulfillmentService;
use crate::model::CartLine;
use crate::notify::NotificationDispatcher;
use crate::pricing::{compute_cart_pricing, CartPricing};
use crate::settlement::SettlementService;
use crate::store::{AddressBook, Catalog, OrderStore, VendorStore};
use std::sync::Arc;

/// A backend implementing every store trait (the in-memory store, the
/// PostgreSQL store).
pub trait Backend: Catalog + AddressBook + OrderStore + VendorStore + 'static {}

impl<T> Backend for T where T: Catalog + AddressBook + OrderStore + VendorStore + 'static {}

pub struct Engine {
  pub config: EngineConfig,
  pub checkout: CheckoutService,
  pub fulfillment: FulfillmentService,
  pub settlement: SettlementService,
}

impl Engine {
  pub fn new<B: Backend>(backend: Arc<B>, config: EngineConfig, notifications: Option<NotificationDispatcher>) -> Self {
    Self::with_barcodes(backend, config, notifications, Arc::new(RandomBarcodes))
  }

  pub fn with_barcodes<B: Backend>(
    backend: Arc<B>,
    config: EngineConfig,
    notifications: Option<NotificationDispatcher>,
    barcodes: Arc<dyn BarcodeSource>,
  ) -> Self {
    let deps = CheckoutDeps {
      catalog: backend.clone(),
      addresses: backend.clone(),
      orders: backend.clone(),
      barcodes,
      notifications,
      config,
    };
    Self {
      config,
      checkout: CheckoutService::new(deps),
      fulfillment: FulfillmentService::new(backend.clone(), config.transitions),
      settlement: SettlementService::new(backend.clone(), backend),
    }
  }

  pub fn price_cart(&self, lines: &[CartLine]) -> SettlementResult<CartPricing> {
    compute_cart_pricing(lines, &self.config.pricing)
  }
}
