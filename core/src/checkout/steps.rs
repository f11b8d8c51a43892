// core/src/checkout/steps.rs

//! Step handlers of the checkout pipeline.
//!
//! Handlers copy what they need out of the context, drop the guard, await the
//! collaborator, then write results back. A lock guard is never held across
//! an `.await`.

use super::context::CheckoutCtxData;
use crate::barcode::ensure_unique_barcode;
use crate::error::{SettlementError, SettlementResult, StoreError};
use crate::model::{Order, OrderItem, OrderStatus, PaymentStatus, ProductId, VendorId};
use crate::pricing::{check_line_total, checked_sum};
use crate::workflow::{ContextData, PipelineControl};
use chrono::Utc;
use tracing::{info, warn};

pub const VALIDATE_REQUEST: &str = "validate_request";
pub const VERIFY_ADDRESS: &str = "verify_address";
pub const RESOLVE_VENDORS: &str = "resolve_vendors";
pub const PRICE_ITEMS: &str = "price_items";
pub const PERSIST_ORDER: &str = "persist_order";
pub const NOTIFY_ORDER_CREATED: &str = "notify_order_created";

pub async fn validate_request(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let guard = ctx.read();
  if !guard.caller.may_act_for_buyer(guard.buyer_id) {
    warn!(caller = %guard.caller.user_id, buyer_id = %guard.buyer_id, "Caller may not check out for this buyer.");
    return Err(SettlementError::Unauthorized(
      "caller may not place orders for this buyer".to_string(),
    ));
  }
  if guard.items.is_empty() {
    return Err(SettlementError::InvalidRequest("checkout contains no items".to_string()));
  }
  if guard.address_id.is_none() {
    return Err(SettlementError::InvalidRequest("address_id is required".to_string()));
  }
  Ok(PipelineControl::Continue)
}

pub async fn verify_address(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let (addresses, buyer_id, address_id) = {
    let guard = ctx.read();
    let address_id = guard
      .address_id
      .ok_or_else(|| SettlementError::InvalidRequest("address_id is required".to_string()))?;
    (guard.deps.addresses.clone(), guard.buyer_id, address_id)
  };

  let address = addresses
    .find_address(buyer_id, address_id)
    .await?
    .ok_or(SettlementError::InvalidAddress { address_id })?;

  ctx.write().address = Some(address);
  Ok(PipelineControl::Continue)
}

pub async fn resolve_vendors(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let (catalog, product_ids) = {
    let guard = ctx.read();
    let mut ids: Vec<ProductId> = Vec::with_capacity(guard.items.len());
    for item in &guard.items {
      if !ids.contains(&item.product_id) {
        ids.push(item.product_id);
      }
    }
    (guard.deps.catalog.clone(), ids)
  };

  let resolved = catalog.resolve_products(&product_ids).await?;

  if let Some(missing) = product_ids.iter().find(|id| !resolved.contains_key(id)) {
    return Err(SettlementError::InvalidRequest(format!("unknown product {}", missing)));
  }

  let mut blocked_vendors: Vec<VendorId> = Vec::new();
  let mut blocked_products: Vec<ProductId> = Vec::new();
  for product_id in &product_ids {
    let vendor = resolved.get(product_id).and_then(|entry| entry.vendor);
    if let Some(vendor) = vendor.filter(|v| v.is_blocked) {
      blocked_products.push(*product_id);
      if !blocked_vendors.contains(&vendor.id) {
        blocked_vendors.push(vendor.id);
      }
    }
  }
  if !blocked_vendors.is_empty() {
    warn!(vendor_ids = ?blocked_vendors, product_ids = ?blocked_products, "Checkout rejected: blocked vendor in cart.");
    return Err(SettlementError::VendorBlocked {
      vendor_ids: blocked_vendors,
      product_ids: blocked_products,
    });
  }

  ctx.write().catalog = resolved;
  Ok(PipelineControl::Continue)
}

pub async fn price_items(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let mut guard = ctx.write();
  let order_id = guard.order_id;

  let mut order_items = Vec::with_capacity(guard.items.len());
  for item in &guard.items {
    let entry = guard
      .catalog
      .get(&item.product_id)
      .ok_or_else(|| SettlementError::InvalidRequest(format!("unknown product {}", item.product_id)))?;
    check_line_total(item.product_id, item.total_price)?;
    order_items.push(OrderItem {
      id: uuid::Uuid::new_v4(),
      order_id,
      product_id: item.product_id,
      product_name: entry.name.clone(),
      quantity: item.normalized_quantity(),
      unit_price: item.unit_price,
      total_price: item.total_price,
      vendor_id: entry.vendor.map(|v| v.id),
      options: item.options.clone(),
      uploaded_file_url: item.uploaded_file_url.clone(),
    });
  }

  guard.total_amount = checked_sum(order_items.iter().map(|i| i.total_price), "order total")?;
  guard.order_items = order_items;
  Ok(PipelineControl::Continue)
}

pub async fn persist_order(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let (deps, mut order) = {
    let guard = ctx.read();
    let address_id = guard
      .address_id
      .ok_or_else(|| SettlementError::InvalidRequest("address_id is required".to_string()))?;
    let now = Utc::now();
    let order = Order {
      id: guard.order_id,
      barcode: String::new(),
      buyer_id: guard.buyer_id,
      address_id,
      total_amount: guard.total_amount,
      status: OrderStatus::Pending,
      payment_status: PaymentStatus::AwaitingPayment,
      shipping_carrier: None,
      tracking_number: None,
      created_at: now,
      updated_at: now,
      items: guard.order_items.clone(),
    };
    (guard.deps.clone(), order)
  };

  let attempts = deps.config.insert_attempts.max(1);
  for attempt in 1..=attempts {
    order.barcode =
      ensure_unique_barcode(deps.orders.as_ref(), deps.barcodes.as_ref(), deps.config.barcode_attempts).await?;
    match deps.orders.insert_order(&order).await {
      Ok(()) => {
        info!(order_id = %order.id, barcode = %order.barcode, total = %order.total_amount, "Order persisted.");
        ctx.write().order = Some(order);
        return Ok(PipelineControl::Continue);
      }
      Err(StoreError::DuplicateBarcode { barcode }) => {
        warn!(attempt, barcode = %barcode, "Insert rejected on duplicate barcode; regenerating.");
      }
      Err(e) => return Err(e.into()),
    }
  }

  Err(SettlementError::PersistenceConflict(format!(
    "no free barcode after {} insert attempts",
    attempts
  )))
}

pub async fn notify_order_created(ctx: ContextData<CheckoutCtxData>) -> SettlementResult<PipelineControl> {
  let guard = ctx.read();
  if let (Some(dispatcher), Some(order)) = (&guard.deps.notifications, &guard.order) {
    dispatcher.dispatch(order.clone());
  }
  Ok(PipelineControl::Continue)
}
