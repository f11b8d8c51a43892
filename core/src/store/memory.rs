// core/src/store/memory.rs

//! Process-local store implementing every collaborator trait. Used by tests,
//! benchmarks and the walkthrough example.

use super::{AddressBook, Catalog, CompletedItem, OrderStore, StoreResult, VendorStore};
use crate::error::StoreError;
use crate::model::{
  Address, AddressId, BuyerId, CatalogEntry, Order, OrderId, OrderStatus, ProductId, Vendor, VendorId, VendorSnapshot,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ProductRecord {
  name: String,
  vendor_id: Option<VendorId>,
}

#[derive(Debug, Default)]
struct Tables {
  vendors: HashMap<VendorId, Vendor>,
  products: HashMap<ProductId, ProductRecord>,
  addresses: HashMap<AddressId, Address>,
  orders: HashMap<OrderId, Order>,
  barcodes: HashMap<String, OrderId>,
}

/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_vendor(&self, name: &str, commission_rate: Decimal) -> Vendor {
    let vendor = Vendor {
      id: uuid::Uuid::new_v4(),
      name: name.to_string(),
      commission_rate,
      balance: Decimal::ZERO,
      is_blocked: false,
    };
    self.tables.write().vendors.insert(vendor.id, vendor.clone());
    vendor
  }

  /// `vendor_id: None` registers a platform product.
  pub fn add_product(&self, name: &str, vendor_id: Option<VendorId>) -> ProductId {
    let product_id = uuid::Uuid::new_v4();
    self.tables.write().products.insert(
      product_id,
      ProductRecord {
        name: name.to_string(),
        vendor_id,
      },
    );
    product_id
  }

  pub fn add_address(&self, buyer_id: BuyerId, recipient: &str) -> Address {
    let address = Address {
      id: uuid::Uuid::new_v4(),
      buyer_id,
      recipient: recipient.to_string(),
      line1: "1 Market Street".to_string(),
      city: "Springfield".to_string(),
      postal_code: "10001".to_string(),
      country: "US".to_string(),
    };
    self.tables.write().addresses.insert(address.id, address.clone());
    address
  }

  /// Rewrites an order's creation time. Returns `false` for an unknown order.
  pub fn backdate_order(&self, order_id: OrderId, created_at: DateTime<Utc>) -> bool {
    match self.tables.write().orders.get_mut(&order_id) {
      Some(order) => {
        order.created_at = created_at;
        true
      }
      None => false,
    }
  }

  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }

  pub fn item_count(&self) -> usize {
    self.tables.read().orders.values().map(|o| o.items.len()).sum()
  }
}

#[async_trait]
impl Catalog for InMemoryStore {
  async fn resolve_products(&self, product_ids: &[ProductId]) -> StoreResult<HashMap<ProductId, CatalogEntry>> {
    let tables = self.tables.read();
    let mut resolved = HashMap::new();
    for product_id in product_ids {
      if let Some(product) = tables.products.get(product_id) {
        // Mirrors the foreign key the SQL schema enforces on products.vendor_id.
        let vendor = match product.vendor_id {
          Some(vendor_id) => {
            let v = tables.vendors.get(&vendor_id).ok_or_else(|| {
              StoreError::backend(anyhow::anyhow!(
                "product {} references unknown vendor {}",
                product_id,
                vendor_id
              ))
            })?;
            Some(VendorSnapshot {
              id: v.id,
              is_blocked: v.is_blocked,
            })
          }
          None => None,
        };
        resolved.insert(
          *product_id,
          CatalogEntry {
            product_id: *product_id,
            name: product.name.clone(),
            vendor,
          },
        );
      }
    }
    Ok(resolved)
  }
}

#[async_trait]
impl AddressBook for InMemoryStore {
  async fn find_address(&self, buyer_id: BuyerId, address_id: AddressId) -> StoreResult<Option<Address>> {
    Ok(
      self
        .tables
        .read()
        .addresses
        .get(&address_id)
        .filter(|a| a.buyer_id == buyer_id)
        .cloned(),
    )
  }
}

#[async_trait]
impl OrderStore for InMemoryStore {
  async fn barcode_exists(&self, barcode: &str) -> StoreResult<bool> {
    Ok(self.tables.read().barcodes.contains_key(barcode))
  }

  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    let mut tables = self.tables.write();
    if tables.barcodes.contains_key(&order.barcode) {
      return Err(StoreError::DuplicateBarcode {
        barcode: order.barcode.clone(),
      });
    }
    tables.barcodes.insert(order.barcode.clone(), order.id);
    tables.orders.insert(order.id, order.clone());
    Ok(())
  }

  async fn find_order(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
    Ok(self.tables.read().orders.get(&order_id).cloned())
  }

  async fn find_by_barcode(&self, barcode: &str) -> StoreResult<Option<Order>> {
    let tables = self.tables.read();
    Ok(
      tables
        .barcodes
        .get(barcode)
        .and_then(|order_id| tables.orders.get(order_id))
        .cloned(),
    )
  }

  async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> StoreResult<Option<Order>> {
    let mut tables = self.tables.write();
    Ok(tables.orders.get_mut(&order_id).map(|order| {
      order.status = status;
      order.updated_at = Utc::now();
      order.clone()
    }))
  }

  async fn update_tracking(
    &self,
    order_id: OrderId,
    carrier: Option<String>,
    tracking_number: Option<String>,
  ) -> StoreResult<Option<Order>> {
    let mut tables = self.tables.write();
    Ok(tables.orders.get_mut(&order_id).map(|order| {
      order.shipping_carrier = carrier;
      order.tracking_number = tracking_number;
      order.updated_at = Utc::now();
      order.clone()
    }))
  }

  async fn list_orders(&self, buyer_id: Option<BuyerId>) -> StoreResult<Vec<Order>> {
    let tables = self.tables.read();
    let mut orders: Vec<Order> = tables
      .orders
      .values()
      .filter(|o| buyer_id.map_or(true, |buyer| o.buyer_id == buyer))
      .cloned()
      .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
  }

  async fn completed_vendor_items(
    &self,
    vendor_id: VendorId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> StoreResult<Vec<CompletedItem>> {
    let tables = self.tables.read();
    let mut items: Vec<CompletedItem> = tables
      .orders
      .values()
      .filter(|o| o.status == OrderStatus::Completed)
      .filter(|o| from.map_or(true, |from| o.created_at >= from))
      .filter(|o| to.map_or(true, |to| o.created_at < to))
      .flat_map(|o| {
        o.items
          .iter()
          .filter(|item| item.vendor_id == Some(vendor_id))
          .map(move |item| CompletedItem {
            barcode: o.barcode.clone(),
            order_created_at: o.created_at,
            item: item.clone(),
          })
      })
      .collect();
    items.sort_by(|a, b| a.order_created_at.cmp(&b.order_created_at).then_with(|| a.barcode.cmp(&b.barcode)));
    Ok(items)
  }
}

#[async_trait]
impl VendorStore for InMemoryStore {
  async fn find_vendor(&self, vendor_id: VendorId) -> StoreResult<Option<Vendor>> {
    Ok(self.tables.read().vendors.get(&vendor_id).cloned())
  }

  async fn list_vendors(&self) -> StoreResult<Vec<Vendor>> {
    let mut vendors: Vec<Vendor> = self.tables.read().vendors.values().cloned().collect();
    vendors.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(vendors)
  }

  async fn set_commission_rate(&self, vendor_id: VendorId, rate: Decimal) -> StoreResult<Option<Vendor>> {
    let mut tables = self.tables.write();
    Ok(tables.vendors.get_mut(&vendor_id).map(|vendor| {
      vendor.commission_rate = rate;
      vendor.clone()
    }))
  }

  async fn set_blocked(&self, vendor_id: VendorId, blocked: bool) -> StoreResult<Option<Vendor>> {
    let mut tables = self.tables.write();
    Ok(tables.vendors.get_mut(&vendor_id).map(|vendor| {
      vendor.is_blocked = blocked;
      vendor.clone()
    }))
  }
}
