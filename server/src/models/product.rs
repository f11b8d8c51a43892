// server/src/models/product.rs

use order_settlement::model::VendorSnapshot;
use order_settlement::CatalogEntry;
use sqlx::FromRow;
use uuid::Uuid;

/// A product joined with its vendor's block flag.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRow {
  pub product_id: Uuid,
  pub name: String,
  pub vendor_id: Option<Uuid>,
  pub vendor_is_blocked: Option<bool>,
}

impl From<CatalogRow> for CatalogEntry {
  fn from(row: CatalogRow) -> Self {
    CatalogEntry {
      product_id: row.product_id,
      name: row.name,
      vendor: row.vendor_id.map(|id| VendorSnapshot {
        id,
        is_blocked: row.vendor_is_blocked.unwrap_or(false),
      }),
    }
  }
}
