// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use order_settlement::model::{AddressId, BuyerId, OrderId, ProductId, VendorId};
use order_settlement::store::{CompletedItem, StoreResult};
use order_settlement::{
  Address, AddressBook, BarcodeSource, Caller, Catalog, CatalogEntry, CheckoutItem, Engine, EngineConfig,
  InMemoryStore, NotificationDispatcher, Order, OrderNotifier, OrderStatus, OrderStore, StoreError, Vendor,
  VendorStore,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn dec(s: &str) -> Decimal {
  s.parse().unwrap()
}

pub fn item(product_id: ProductId, quantity: i64, unit: &str, total: &str) -> CheckoutItem {
  CheckoutItem {
    product_id,
    quantity,
    unit_price: dec(unit),
    total_price: dec(total),
    options: Default::default(),
    uploaded_file_url: None,
  }
}

// --- Seeded marketplace ---
pub struct Marketplace {
  pub store: Arc<InMemoryStore>,
  pub admin: Caller,
  pub buyer: Caller,
  pub address: Address,
  pub vendor: Vendor,
  pub other_vendor: Vendor,
  pub vendor_product: ProductId,
  pub other_vendor_product: ProductId,
  pub platform_product: ProductId,
}

impl Marketplace {
  pub fn seed() -> Self {
    let store = Arc::new(InMemoryStore::new());
    let buyer = Caller::buyer(Uuid::new_v4());
    let address = store.add_address(buyer.user_id, "Ada Buyer");
    let vendor = store.add_vendor("Northwind Prints", dec("2.0"));
    let other_vendor = store.add_vendor("Southside Mugs", dec("10"));
    let vendor_product = store.add_product("Poster A2", Some(vendor.id));
    let other_vendor_product = store.add_product("Mug", Some(other_vendor.id));
    let platform_product = store.add_product("Gift Card", None);
    Self {
      store,
      admin: Caller::admin(Uuid::new_v4()),
      buyer,
      address,
      vendor,
      other_vendor,
      vendor_product,
      other_vendor_product,
      platform_product,
    }
  }

  pub fn engine(&self) -> Engine {
    Engine::new(self.store.clone(), EngineConfig::default(), None)
  }

  pub fn engine_with(&self, config: EngineConfig, notifications: Option<NotificationDispatcher>) -> Engine {
    Engine::new(self.store.clone(), config, notifications)
  }

  pub fn vendor_caller(&self) -> Caller {
    Caller::vendor(Uuid::new_v4(), self.vendor.id)
  }

  /// Places an order for the seeded buyer and returns it.
  pub async fn place(&self, engine: &Engine, items: Vec<CheckoutItem>) -> Order {
    engine
      .checkout
      .create_order(self.buyer, self.buyer.user_id, Some(self.address.id), items)
      .await
      .unwrap()
      .order
  }

  pub async fn complete(&self, engine: &Engine, order_id: OrderId) {
    engine
      .fulfillment
      .set_status(&self.admin, order_id, OrderStatus::Completed)
      .await
      .unwrap();
  }
}

// --- Barcode sources ---

/// Replays a fixed list of candidates, repeating the last one forever.
pub struct ScriptedBarcodes {
  candidates: Vec<String>,
  next: AtomicUsize,
}

impl ScriptedBarcodes {
  pub fn new(candidates: &[&str]) -> Self {
    Self {
      candidates: candidates.iter().map(|c| c.to_string()).collect(),
      next: AtomicUsize::new(0),
    }
  }

  pub fn served(&self) -> usize {
    self.next.load(Ordering::SeqCst)
  }
}

impl BarcodeSource for ScriptedBarcodes {
  fn next_candidate(&self) -> String {
    let index = self.next.fetch_add(1, Ordering::SeqCst);
    self.candidates[index.min(self.candidates.len() - 1)].clone()
  }
}

// --- Notifiers ---

#[derive(Default)]
pub struct RecordingNotifier {
  pub delivered: parking_lot::Mutex<Vec<String>>,
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
  async fn order_created(&self, order: &Order) -> anyhow::Result<()> {
    self.delivered.lock().push(order.barcode.clone());
    Ok(())
  }
}

#[derive(Default)]
pub struct FailingNotifier {
  pub calls: AtomicUsize,
}

#[async_trait]
impl OrderNotifier for FailingNotifier {
  async fn order_created(&self, _order: &Order) -> anyhow::Result<()> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    anyhow::bail!("smtp relay unreachable")
  }
}

// --- Store wrapper with injectable failures ---

/// Delegates to an `InMemoryStore`, optionally failing inserts.
pub struct FaultyStore {
  pub inner: InMemoryStore,
  pub fail_inserts: AtomicBool,
  /// Reports every insert as a duplicate barcode, as a racing writer would.
  pub duplicate_inserts: AtomicBool,
  pub insert_calls: AtomicUsize,
}

impl FaultyStore {
  pub fn wrap(inner: InMemoryStore) -> Self {
    Self {
      inner,
      fail_inserts: AtomicBool::new(false),
      duplicate_inserts: AtomicBool::new(false),
      insert_calls: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl Catalog for FaultyStore {
  async fn resolve_products(&self, product_ids: &[ProductId]) -> StoreResult<HashMap<ProductId, CatalogEntry>> {
    self.inner.resolve_products(product_ids).await
  }
}

#[async_trait]
impl AddressBook for FaultyStore {
  async fn find_address(&self, buyer_id: BuyerId, address_id: AddressId) -> StoreResult<Option<Address>> {
    self.inner.find_address(buyer_id, address_id).await
  }
}

#[async_trait]
impl OrderStore for FaultyStore {
  async fn barcode_exists(&self, barcode: &str) -> StoreResult<bool> {
    self.inner.barcode_exists(barcode).await
  }

  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    self.insert_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_inserts.load(Ordering::SeqCst) {
      return Err(StoreError::backend(anyhow::anyhow!("connection reset during commit")));
    }
    if self.duplicate_inserts.load(Ordering::SeqCst) {
      return Err(StoreError::DuplicateBarcode {
        barcode: order.barcode.clone(),
      });
    }
    self.inner.insert_order(order).await
  }

  async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    self.inner.find_order(order_id).await
  }

  async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Order>> {
    self.inner.find_by_barcode(barcode).await
  }

  async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<Option<Order>> {
    self.inner.update_status(order_id, status).await
  }

  async fn update_tracking(
    &self,
    order_id: OrderId,
    carrier: Option<String>,
    tracking_number: Option<String>,
  ) -> StoreResult<Option<Order>> {
    self.inner.update_tracking(order_id, carrier, tracking_number).await
  }

  async fn list_orders(&self, buyer_id: Option<BuyerId>) -> StoreResult<Vec<Order>> {
    self.inner.list_orders(buyer_id).await
  }

  async fn completed_vendor_items(
    &self,
    vendor_id: VendorId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> StoreResult<Vec<CompletedItem>> {
    self.inner.completed_vendor_items(vendor_id, from, to).await
  }
}

#[async_trait]
impl VendorStore for FaultyStore {
  async fn find_vendor(&self, vendor_id: VendorId) -> StoreResult<Option<Vendor>> {
    self.inner.find_vendor(vendor_id).await
  }

  async fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
    self.inner.list_vendors().await
  }

  async fn set_commission_rate(&self, vendor_id: VendorId, rate: Decimal) -> StoreResult<Option<Vendor>> {
    self.inner.set_commission_rate(vendor_id, rate).await
  }

  async fn set_blocked(&self, vendor_id: VendorId, blocked: bool) -> StoreResult<Option<Vendor>> {
    self.inner.set_blocked(vendor_id, blocked).await
  }
}
