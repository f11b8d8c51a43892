// core/src/model/mod.rs

//! Domain records shared by every component of the engine.

pub mod address;
pub mod caller;
pub mod cart;
pub mod order;
pub mod vendor;

pub type OrderId = uuid::Uuid;
pub type BuyerId = uuid::Uuid;
pub type AddressId = uuid::Uuid;
pub type ProductId = uuid::Uuid;
pub type VendorId = uuid::Uuid;

/// Opaque option selections captured with a line item (size, finish, ...).
pub type ItemOptions = serde_json::Map<String, serde_json::Value>;

pub use address::Address;
pub use caller::{Caller, Role};
pub use cart::{CartLine, CheckoutItem};
pub use order::{Order, OrderItem, OrderStatus, PaymentStatus};
pub use vendor::{CatalogEntry, Vendor, VendorSnapshot};
