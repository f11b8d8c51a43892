// server/src/models/mod.rs

//! Database row types and their conversion into engine records.

pub mod address;
pub mod order;
pub mod order_item;
pub mod product;
pub mod vendor;

pub use address::AddressRow;
pub use order::OrderRow;
pub use order_item::{CompletedItemRow, OrderItemRow};
pub use product::CatalogRow;
pub use vendor::VendorRow;
