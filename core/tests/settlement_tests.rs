// tests/settlement_tests.rs
mod common;

use chrono::{Duration, Utc};
use common::*;
use order_settlement::{render_statement, OrderStatus, SettlementError, StatementWindow};
use serial_test::serial;
use uuid::Uuid;

#[tokio::test]
#[serial]
async fn test_commission_and_net_over_completed_orders_only() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();

  let a = m.place(&engine, vec![item(m.vendor_product, 1, "4000", "4000")]).await;
  let b = m
    .place(
      &engine,
      vec![
        item(m.vendor_product, 2, "2000", "4000"),
        item(m.other_vendor_product, 1, "999", "999"),
      ],
    )
    .await;
  let c = m.place(&engine, vec![item(m.vendor_product, 1, "2000", "2000")]).await;
  let shipped = m.place(&engine, vec![item(m.vendor_product, 1, "500", "500")]).await;
  for order in [&a, &b, &c] {
    m.complete(&engine, order.id).await;
  }
  engine
    .fulfillment
    .set_status(&m.admin, shipped.id, OrderStatus::Shipped)
    .await
    .unwrap();

  let statement = engine
    .settlement
    .compute_statement(&m.admin, m.vendor.id, StatementWindow::all_time())
    .await
    .unwrap();
  assert_eq!(statement.commission_rate, dec("2.0"));
  assert_eq!(statement.total_revenue, dec("10000"));
  assert_eq!(statement.commission_amount, dec("200"));
  assert_eq!(statement.net_payable, dec("9800"));
  assert_eq!(statement.items.len(), 3);
  assert!(statement.items.iter().all(|c| c.item.vendor_id == Some(m.vendor.id)));
  assert!(statement.items.iter().all(|c| c.barcode != shipped.barcode));
}

#[tokio::test]
#[serial]
async fn test_rate_change_applies_to_earlier_orders() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();
  let order = m.place(&engine, vec![item(m.vendor_product, 1, "1000", "1000")]).await;
  m.complete(&engine, order.id).await;

  engine
    .settlement
    .set_commission_rate(&m.admin, m.vendor.id, dec("12.5"))
    .await
    .unwrap();
  let statement = engine
    .settlement
    .compute_statement(&m.admin, m.vendor.id, StatementWindow::all_time())
    .await
    .unwrap();
  assert_eq!(statement.commission_amount, dec("125"));
  assert_eq!(statement.net_payable, dec("875"));

  let bad = engine.settlement.set_commission_rate(&m.admin, m.vendor.id, dec("100.01")).await;
  assert!(matches!(bad, Err(SettlementError::InvalidRequest(_))));
}

#[tokio::test]
#[serial]
async fn test_window_is_from_inclusive_to_exclusive() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();
  let now = Utc::now();

  let early = m.place(&engine, vec![item(m.vendor_product, 1, "100", "100")]).await;
  let edge = m.place(&engine, vec![item(m.vendor_product, 1, "10", "10")]).await;
  let late = m.place(&engine, vec![item(m.vendor_product, 1, "1", "1")]).await;
  let from = now - Duration::days(10);
  let to = now - Duration::days(1);
  assert!(m.store.backdate_order(early.id, from - Duration::seconds(1)));
  assert!(m.store.backdate_order(edge.id, from));
  assert!(m.store.backdate_order(late.id, to));
  for order in [&early, &edge, &late] {
    m.complete(&engine, order.id).await;
  }

  let statement = engine
    .settlement
    .compute_statement(&m.admin, m.vendor.id, StatementWindow::between(from, to))
    .await
    .unwrap();
  assert_eq!(statement.total_revenue, dec("10"));
  assert_eq!(statement.items.len(), 1);
  assert_eq!(statement.items[0].barcode, edge.barcode);
}

#[tokio::test]
#[serial]
async fn test_statement_access_rules() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();

  let own = engine
    .settlement
    .compute_statement(&m.vendor_caller(), m.vendor.id, StatementWindow::all_time())
    .await;
  assert!(own.is_ok());

  let foreign = engine
    .settlement
    .compute_statement(&m.vendor_caller(), m.other_vendor.id, StatementWindow::all_time())
    .await;
  assert!(matches!(foreign, Err(SettlementError::Unauthorized(_))));

  let buyer = engine
    .settlement
    .compute_statement(&m.buyer, m.vendor.id, StatementWindow::all_time())
    .await;
  assert!(matches!(buyer, Err(SettlementError::Unauthorized(_))));

  let missing = engine
    .settlement
    .compute_statement(&m.admin, Uuid::new_v4(), StatementWindow::all_time())
    .await;
  assert!(matches!(missing, Err(SettlementError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn test_all_statements_cover_every_vendor() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();
  let order = m
    .place(
      &engine,
      vec![
        item(m.vendor_product, 1, "300", "300"),
        item(m.other_vendor_product, 1, "50", "50"),
        item(m.platform_product, 1, "25", "25"),
      ],
    )
    .await;
  m.complete(&engine, order.id).await;

  let statements = engine
    .settlement
    .compute_all_statements(&m.admin, StatementWindow::all_time())
    .await
    .unwrap();
  assert_eq!(statements.len(), 2);
  let north = statements.iter().find(|s| s.vendor_id == m.vendor.id).unwrap();
  let south = statements.iter().find(|s| s.vendor_id == m.other_vendor.id).unwrap();
  assert_eq!(north.total_revenue, dec("300"));
  assert_eq!(north.commission_amount, dec("6"));
  assert_eq!(south.total_revenue, dec("50"));
  assert_eq!(south.commission_amount, dec("5"));

  let denied = engine
    .settlement
    .compute_all_statements(&m.vendor_caller(), StatementWindow::all_time())
    .await;
  assert!(matches!(denied, Err(SettlementError::Unauthorized(_))));
}

#[tokio::test]
#[serial]
async fn test_blocking_a_vendor_stops_new_checkouts_only() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();
  let before = m.place(&engine, vec![item(m.vendor_product, 1, "40", "40")]).await;

  let vendor = engine
    .settlement
    .set_vendor_blocked(&m.admin, m.vendor.id, true)
    .await
    .unwrap();
  assert!(vendor.is_blocked);

  let rejected = engine
    .checkout
    .create_order(m.buyer, m.buyer.user_id, Some(m.address.id), vec![item(m.vendor_product, 1, "40", "40")])
    .await;
  assert!(matches!(rejected, Err(SettlementError::VendorBlocked { .. })));

  // Existing orders still settle.
  m.complete(&engine, before.id).await;
  let statement = engine
    .settlement
    .compute_statement(&m.admin, m.vendor.id, StatementWindow::all_time())
    .await
    .unwrap();
  assert_eq!(statement.total_revenue, dec("40"));
}

#[tokio::test]
#[serial]
async fn test_printed_statement_carries_the_numbers() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = m.engine();
  let order = m.place(&engine, vec![item(m.vendor_product, 4, "250", "1000")]).await;
  m.complete(&engine, order.id).await;

  let statement = engine
    .settlement
    .compute_statement(&m.admin, m.vendor.id, StatementWindow::all_time())
    .await
    .unwrap();
  let text = render_statement(&statement, 56);
  assert!(text.contains("Northwind Prints"));
  assert!(text.contains(&order.barcode));
  assert!(text.contains("1000.00"));
  assert!(text.contains("20.00"));
  assert!(text.contains("980.00"));
  assert!(text.lines().all(|line| line.chars().count() <= 56));
}
