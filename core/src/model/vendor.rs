// core/src/model/vendor.rs

use super::{ProductId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
  pub id: VendorId,
  pub name: String,
  /// Percentage in `0..=100`, applied to every settlement computed after it changes.
  pub commission_rate: Decimal,
  /// Maintained by the payout process.
  pub balance: Decimal,
  pub is_blocked: bool,
}

/// The part of a vendor the checkout needs when a product is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSnapshot {
  pub id: VendorId,
  pub is_blocked: bool,
}

/// A product as the catalog describes it at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub product_id: ProductId,
  pub name: String,
  pub vendor: Option<VendorSnapshot>,
}
