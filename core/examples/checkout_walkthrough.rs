// core/examples/checkout_walkthrough.rs

//! One order from cart to vendor payout, against the in-memory store.
//!
//! Run with `RUST_LOG=debug` to see the per-step pipeline spans.

use order_settlement::{
  render_statement, Caller, CartLine, CheckoutItem, Engine, EngineConfig, InMemoryStore, LoggingNotifier,
  NotificationDispatcher, OrderStatus, SettlementError, StatementWindow,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), SettlementError> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  info!("--- Checkout Walkthrough ---");

  // 1. Seed a tiny marketplace
  let store = Arc::new(InMemoryStore::new());
  let admin = Caller::admin(Uuid::new_v4());
  let buyer = Caller::buyer(Uuid::new_v4());
  let address = store.add_address(buyer.user_id, "Ada Buyer");
  let vendor = store.add_vendor("Northwind Prints", Decimal::new(20, 1));
  let poster = store.add_product("Poster A2", Some(vendor.id));
  let gift_card = store.add_product("Gift Card", None);

  let (notifications, _worker) = NotificationDispatcher::spawn(Arc::new(LoggingNotifier));
  let engine = Engine::new(store.clone(), EngineConfig::default(), Some(notifications));

  // 2. Price the cart the buyer is looking at
  let items = vec![
    CheckoutItem {
      product_id: poster,
      quantity: 2,
      unit_price: Decimal::new(50, 0),
      total_price: Decimal::new(100, 0),
      options: Default::default(),
      uploaded_file_url: None,
    },
    CheckoutItem {
      product_id: gift_card,
      quantity: 1,
      unit_price: Decimal::new(30, 0),
      total_price: Decimal::new(30, 0),
      options: Default::default(),
      uploaded_file_url: None,
    },
  ];
  let lines: Vec<CartLine> = items.iter().map(CartLine::from).collect();
  let pricing = engine.price_cart(&lines)?;
  info!(
    subtotal = %pricing.total_amount,
    shipping = %pricing.shipping_cost,
    remaining_for_free_shipping = %pricing.remaining_for_free_shipping,
    "Cart priced."
  );

  // 3. Check out
  let placed = engine
    .checkout
    .create_order(buyer, buyer.user_id, Some(address.id), items)
    .await?;
  info!(barcode = %placed.order.barcode, total = %placed.order.total_amount, "Order placed.");

  // 4. Fulfil: scan at the warehouse, ship, complete
  let scan = engine
    .fulfillment
    .scan_to_processing(&admin, &placed.order.barcode)
    .await?;
  info!("{}", scan.message);
  engine
    .fulfillment
    .set_tracking(&admin, placed.order.id, Some("DHL".into()), Some("JD014600003812".into()))
    .await?;
  for status in [OrderStatus::Shipped, OrderStatus::Completed] {
    engine.fulfillment.set_status(&admin, placed.order.id, status).await?;
  }
  let tracking = engine.fulfillment.track(&placed.order.barcode).await?;
  info!(progress = ?tracking.progress, "Public tracking view.");

  // 5. Settle with the vendor
  let statement = engine
    .settlement
    .compute_statement(&admin, vendor.id, StatementWindow::all_time())
    .await?;
  println!("{}", render_statement(&statement, 56));

  Ok(())
}
