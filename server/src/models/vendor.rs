// server/src/models/vendor.rs

use order_settlement::Vendor;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct VendorRow {
  pub id: Uuid,
  pub name: String,
  pub commission_rate: Decimal,
  pub balance: Decimal,
  pub is_blocked: bool,
}

impl From<VendorRow> for Vendor {
  fn from(row: VendorRow) -> Self {
    Vendor {
      id: row.id,
      name: row.name,
      commission_rate: row.commission_rate,
      balance: row.balance,
      is_blocked: row.is_blocked,
    }
  }
}
