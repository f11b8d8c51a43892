// tests/barcode_tests.rs
mod common;

use chrono::{Datelike, Utc};
use common::*;
use order_settlement::barcode::is_well_formed;
use order_settlement::{ensure_unique_barcode, Engine, EngineConfig, OrderStore};
use serial_test::serial;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_concurrent_checkouts_get_distinct_barcodes() {
  setup_tracing();
  let m = Marketplace::seed();
  let engine = Arc::new(m.engine());

  let mut handles = Vec::new();
  for _ in 0..64 {
    let engine = engine.clone();
    let buyer = m.buyer;
    let address_id = m.address.id;
    let product = m.vendor_product;
    handles.push(tokio::spawn(async move {
      engine
        .checkout
        .create_order(buyer, buyer.user_id, Some(address_id), vec![item(product, 1, "1", "1")])
        .await
        .map(|placed| placed.order.barcode)
    }));
  }

  let mut barcodes = HashSet::new();
  for handle in handles {
    let barcode = handle.await.unwrap().unwrap();
    assert!(barcodes.insert(barcode));
  }
  assert_eq!(barcodes.len(), 64);
  assert_eq!(m.store.order_count(), 64);
}

#[tokio::test]
#[serial]
async fn test_taken_candidates_are_skipped() {
  setup_tracing();
  let m = Marketplace::seed();
  let scripted = Arc::new(ScriptedBarcodes::new(&["MG-2025-AAAAAA", "MG-2025-AAAAAA", "MG-2025-BBBBBB"]));
  let engine = Engine::with_barcodes(m.store.clone(), EngineConfig::default(), None, scripted.clone());

  let first = m.place(&engine, vec![item(m.vendor_product, 1, "1", "1")]).await;
  assert_eq!(first.barcode, "MG-2025-AAAAAA");

  let second = m.place(&engine, vec![item(m.vendor_product, 1, "1", "1")]).await;
  assert_eq!(second.barcode, "MG-2025-BBBBBB");
  assert_eq!(scripted.served(), 3);
}

#[tokio::test]
#[serial]
async fn test_exhausted_candidates_fall_back_to_timestamp() {
  setup_tracing();
  let m = Marketplace::seed();
  let taken = m.place(&m.engine(), vec![item(m.vendor_product, 1, "1", "1")]).await;

  let scripted = ScriptedBarcodes::new(&[taken.barcode.as_str()]);
  let barcode = ensure_unique_barcode(m.store.as_ref(), &scripted, 20).await.unwrap();

  assert_eq!(scripted.served(), 20);
  assert!(!is_well_formed(&barcode));
  assert!(barcode.starts_with(&format!("MG-{}-T", Utc::now().year())));
  assert!(!m.store.barcode_exists(&barcode).await.unwrap());
}
