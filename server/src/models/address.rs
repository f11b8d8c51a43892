// server/src/models/address.rs

use order_settlement::Address;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AddressRow {
  pub id: Uuid,
  pub buyer_id: Uuid,
  pub recipient: String,
  pub line1: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
}

impl From<AddressRow> for Address {
  fn from(row: AddressRow) -> Self {
    Address {
      id: row.id,
      buyer_id: row.buyer_id,
      recipient: row.recipient,
      line1: row.line1,
      city: row.city,
      postal_code: row.postal_code,
      country: row.country,
    }
  }
}
