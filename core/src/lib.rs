// core/src/lib.rs

//! Order settlement engine for a multi-vendor marketplace.
//!
//! The crate covers the life of an order after the cart:
//!  - Barcodes: short, readable, collision-checked order identifiers.
//!  - Cart pricing: subtotal, shipping fee and the free-shipping threshold.
//!  - Checkout: a named-step pipeline that validates a request, attributes each
//!    line to its vendor and persists the order atomically.
//!  - Fulfillment: status changes by admin action or barcode scan, progress and
//!    public tracking views.
//!  - Settlement: per-vendor revenue, platform commission and net payable over
//!    completed orders, with a printable statement.
//!
//! Storage, the catalog and outbound notifications sit behind the traits in
//! [`store`]; [`store::InMemoryStore`] implements all of them.

pub mod barcode;
pub mod checkout;
pub mod config;
pub mod engine;
pub mod error;
pub mod fulfillment;
pub mod model;
pub mod notify;
pub mod pricing;
pub mod settlement;
pub mod statement_print;
pub mod store;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::barcode::{ensure_unique_barcode, generate_barcode, BarcodeSource, RandomBarcodes};
pub use crate::checkout::{CheckoutService, PlacedOrder};
pub use crate::config::{EngineConfig, TransitionPolicy};
pub use crate::engine::{Backend, Engine};
pub use crate::error::{SettlementError, SettlementResult, StoreError, WorkflowError};
pub use crate::fulfillment::{progress, FulfillmentService, ProgressBadge, ProgressView, ScanOutcome, TrackingView};
pub use crate::model::{
  Address, CartLine, Caller, CatalogEntry, CheckoutItem, Order, OrderItem, OrderStatus, PaymentStatus, Role, Vendor,
};
pub use crate::notify::{LoggingNotifier, NotificationDispatcher};
pub use crate::pricing::{compute_cart_pricing, CartPricing, PricingPolicy};
pub use crate::settlement::{SettlementService, SettlementStatement, StatementWindow};
pub use crate::statement_print::render_statement;
pub use crate::store::{AddressBook, Catalog, CompletedItem, InMemoryStore, OrderNotifier, OrderStore, VendorStore};
pub use crate::workflow::{ContextData, Pipeline, PipelineControl, PipelineResult};
