// core/src/fulfillment.rs

//! Order status lifecycle, buyer-facing progress, shipment tracking and
//! order reads.
//!
//! Writes are last-writer-wins; two admins racing on the same order both
//! succeed and the later write is what remains.

use crate::config::TransitionPolicy;
use crate::error::{SettlementError, SettlementResult};
use crate::model::{Caller, Order, OrderId, OrderStatus, Role};
use crate::store::OrderStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The ordered fulfillment bar shown to buyers.
pub const PROGRESS_STEPS: [OrderStatus; 4] = [
  OrderStatus::Pending,
  OrderStatus::Processing,
  OrderStatus::Shipped,
  OrderStatus::Completed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressBadge {
  Cancelled,
  Returned,
  Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressView {
  /// Zero-based position on `PROGRESS_STEPS`.
  Bar { step: usize, total: usize, status: OrderStatus },
  Badge { badge: ProgressBadge, status: OrderStatus },
}

pub fn progress(status: OrderStatus) -> ProgressView {
  let badge = match status {
    OrderStatus::Cancelled => Some(ProgressBadge::Cancelled),
    OrderStatus::Returned => Some(ProgressBadge::Returned),
    OrderStatus::Refunded => Some(ProgressBadge::Refunded),
    _ => None,
  };
  if let Some(badge) = badge {
    return ProgressView::Badge { badge, status };
  }
  let step = PROGRESS_STEPS.iter().position(|s| *s == status).unwrap_or_default();
  ProgressView::Bar {
    step,
    total: PROGRESS_STEPS.len(),
    status,
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
  pub order_id: OrderId,
  pub barcode: String,
  pub previous_status: OrderStatus,
  pub status: OrderStatus,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
  pub product_name: String,
  pub quantity: i32,
}

/// Public view of an order: no buyer details and no prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingView {
  pub barcode: String,
  pub status: OrderStatus,
  pub progress: ProgressView,
  pub items: Vec<TrackedItem>,
  pub shipping_carrier: Option<String>,
  pub tracking_number: Option<String>,
}

impl From<&Order> for TrackingView {
  fn from(order: &Order) -> Self {
    TrackingView {
      barcode: order.barcode.clone(),
      status: order.status,
      progress: progress(order.status),
      items: order
        .items
        .iter()
        .map(|item| TrackedItem {
          product_name: item.product_name.clone(),
          quantity: item.quantity,
        })
        .collect(),
      shipping_carrier: order.shipping_carrier.clone(),
      tracking_number: order.tracking_number.clone(),
    }
  }
}

#[derive(Clone)]
pub struct FulfillmentService {
  orders: Arc<dyn OrderStore>,
  policy: TransitionPolicy,
}

impl FulfillmentService {
  pub fn new(orders: Arc<dyn OrderStore>, policy: TransitionPolicy) -> Self {
    Self { orders, policy }
  }

  pub fn policy(&self) -> TransitionPolicy {
    self.policy
  }

  #[instrument(
    name = "FulfillmentService::set_status",
    skip(self, caller),
    fields(caller = %caller.user_id, order_id = %order_id, new_status = %new_status)
  )]
  pub async fn set_status(&self, caller: &Caller, order_id: OrderId, new_status: OrderStatus) -> SettlementResult<Order> {
    caller.require_admin("changing an order status")?;

    let current = self
      .orders
      .find_order(order_id)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("order {}", order_id)))?;
    if !self.policy.allows(current.status, new_status) {
      warn!(from = %current.status, to = %new_status, "Status transition rejected.");
      return Err(SettlementError::IllegalTransition {
        from: current.status,
        to: new_status,
      });
    }

    let updated = self
      .orders
      .update_status(order_id, new_status)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("order {}", order_id)))?;
    info!(from = %current.status, to = %updated.status, barcode = %updated.barcode, "Order status updated.");
    Ok(updated)
  }

  #[instrument(
    name = "FulfillmentService::scan_to_processing",
    skip(self, caller),
    fields(caller = %caller.user_id, barcode = %barcode)
  )]
  pub async fn scan_to_processing(&self, caller: &Caller, barcode: &str) -> SettlementResult<ScanOutcome> {
    caller.require_admin("scanning an order")?;

    let order = self
      .orders
      .find_by_barcode(barcode)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("no order with barcode {}", barcode)))?;
    let previous_status = order.status;
    if !self.policy.allows_scan_from(previous_status) {
      warn!(from = %previous_status, "Scan rejected by transition policy.");
      return Err(SettlementError::IllegalTransition {
        from: previous_status,
        to: OrderStatus::Processing,
      });
    }

    let updated = self
      .orders
      .update_status(order.id, OrderStatus::Processing)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("no order with barcode {}", barcode)))?;
    info!(order_id = %updated.id, from = %previous_status, "Order scanned into processing.");

    Ok(ScanOutcome {
      order_id: updated.id,
      message: format!(
        "Order {} moved to {} (was {})",
        updated.barcode, updated.status, previous_status
      ),
      barcode: updated.barcode,
      previous_status,
      status: updated.status,
    })
  }

  #[instrument(
    name = "FulfillmentService::set_tracking",
    skip(self, caller, carrier, tracking_number),
    fields(caller = %caller.user_id, order_id = %order_id)
  )]
  pub async fn set_tracking(
    &self,
    caller: &Caller,
    order_id: OrderId,
    carrier: Option<String>,
    tracking_number: Option<String>,
  ) -> SettlementResult<Order> {
    caller.require_admin("setting shipment tracking")?;
    let carrier = carrier.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
    let tracking_number = tracking_number.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    let updated = self
      .orders
      .update_tracking(order_id, carrier, tracking_number)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("order {}", order_id)))?;
    info!(barcode = %updated.barcode, "Shipment tracking updated.");
    Ok(updated)
  }

  /// Public lookup; needs no caller.
  #[instrument(name = "FulfillmentService::track", skip(self))]
  pub async fn track(&self, barcode: &str) -> SettlementResult<TrackingView> {
    self
      .orders
      .find_by_barcode(barcode)
      .await?
      .map(|order| TrackingView::from(&order))
      .ok_or_else(|| SettlementError::NotFound(format!("no order with barcode {}", barcode)))
  }

  /// A buyer asking for someone else's order gets `NotFound`, same as for a
  /// missing one.
  #[instrument(
    name = "FulfillmentService::get_order",
    skip(self, caller),
    fields(caller = %caller.user_id, order_id = %order_id)
  )]
  pub async fn get_order(&self, caller: &Caller, order_id: OrderId) -> SettlementResult<Order> {
    let not_found = || SettlementError::NotFound(format!("order {}", order_id));
    let order = self.orders.find_order(order_id).await?.ok_or_else(not_found)?;
    match caller.role {
      Role::Admin => Ok(order),
      Role::Buyer if order.buyer_id == caller.user_id => Ok(order),
      Role::Buyer => Err(not_found()),
      Role::Vendor(_) => Err(SettlementError::Unauthorized(
        "vendors cannot read buyer orders".to_string(),
      )),
    }
  }

  #[instrument(name = "FulfillmentService::list_orders", skip(self, caller), fields(caller = %caller.user_id))]
  pub async fn list_orders(&self, caller: &Caller) -> SettlementResult<Vec<Order>> {
    let scope = match caller.role {
      Role::Admin => None,
      Role::Buyer => Some(caller.user_id),
      Role::Vendor(_) => {
        return Err(SettlementError::Unauthorized(
          "vendors cannot list buyer orders".to_string(),
        ))
      }
    };
    Ok(self.orders.list_orders(scope).await?)
  }
}
