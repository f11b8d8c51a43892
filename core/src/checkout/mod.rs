// core/src/checkout/mod.rs

//! Order assembly: turns a checkout request into a persisted order.
//!
//! The work is a pipeline of named steps. Each precondition is its own step
//! and fails with its own error, so the first failing check decides the
//! error the caller sees: `InvalidRequest`, then `InvalidAddress`, then
//! `VendorBlocked`. Nothing is written before `persist_order`.

pub mod context;
pub mod steps;

pub use context::{CheckoutCtxData, CheckoutDeps};

use crate::error::{SettlementError, SettlementResult, WorkflowError};
use crate::model::{Address, AddressId, BuyerId, Caller, CheckoutItem, Order};
use crate::workflow::{ContextData, Pipeline, PipelineResult, SkipCondition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// A freshly created order with its shipping address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
  pub order: Order,
  pub address: Address,
}

pub struct CheckoutService {
  deps: CheckoutDeps,
  pipeline: Pipeline<CheckoutCtxData, SettlementError>,
}

impl CheckoutService {
  pub fn new(deps: CheckoutDeps) -> Self {
    let without_dispatcher: SkipCondition<CheckoutCtxData> =
      Arc::new(|ctx: ContextData<CheckoutCtxData>| ctx.read().deps.notifications.is_none());
    let mut p = Pipeline::<CheckoutCtxData, SettlementError>::new(&[
      (steps::VALIDATE_REQUEST, false, None),
      (steps::VERIFY_ADDRESS, false, None),
      (steps::RESOLVE_VENDORS, false, None),
      (steps::PRICE_ITEMS, false, None),
      (steps::PERSIST_ORDER, false, None),
      (steps::NOTIFY_ORDER_CREATED, true, Some(without_dispatcher)),
    ]);

    p.on_root(steps::VALIDATE_REQUEST, steps::validate_request);
    p.on_root(steps::VERIFY_ADDRESS, steps::verify_address);
    p.on_root(steps::RESOLVE_VENDORS, steps::resolve_vendors);
    p.on_root(steps::PRICE_ITEMS, steps::price_items);
    p.on_root(steps::PERSIST_ORDER, steps::persist_order);
    p.after_root(steps::NOTIFY_ORDER_CREATED, steps::notify_order_created);

    Self { deps, pipeline: p }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.pipeline.step_names()
  }

  #[instrument(
    name = "CheckoutService::create_order",
    skip(self, items),
    fields(caller = %caller.user_id, buyer_id = %buyer_id, item_count = items.len())
  )]
  pub async fn create_order(
    &self,
    caller: Caller,
    buyer_id: BuyerId,
    address_id: Option<AddressId>,
    items: Vec<CheckoutItem>,
  ) -> SettlementResult<PlacedOrder> {
    let ctx = ContextData::new(CheckoutCtxData::new(
      self.deps.clone(),
      caller,
      buyer_id,
      address_id,
      items,
    ));

    let outcome = self.pipeline.run(ctx.clone()).await?;

    let mut guard = ctx.write();
    let placed = match (outcome, guard.order.take(), guard.address.take()) {
      (PipelineResult::Completed, Some(order), Some(address)) => PlacedOrder { order, address },
      _ => {
        return Err(SettlementError::from(WorkflowError::Incomplete {
          step_name: steps::PERSIST_ORDER.to_string(),
        }))
      }
    };
    info!(order_id = %placed.order.id, barcode = %placed.order.barcode, "Checkout completed.");
    Ok(placed)
  }
}
