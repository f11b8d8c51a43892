// core/src/model/address.rs

use super::{AddressId, BuyerId};
use serde::{Deserialize, Serialize};

/// A buyer's saved shipping address, owned by the address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub id: AddressId,
  pub buyer_id: BuyerId,
  pub recipient: String,
  pub line1: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
}
