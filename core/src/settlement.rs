// core/src/settlement.rs

//! Per-vendor settlement over completed orders, plus vendor administration.
//!
//! Statements are live reports: they always apply the vendor's current
//! commission rate, so a rate change is reflected in every statement computed
//! after it, including for orders completed earlier.

use crate::error::{SettlementError, SettlementResult};
use crate::model::{Caller, Vendor, VendorId};
use crate::pricing::{checked_sum, out_of_range};
use crate::store::{CompletedItem, OrderStore, VendorStore};
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Filters by the owning order's creation time: `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementWindow {
  pub from: Option<DateTime<Utc>>,
  pub to: Option<DateTime<Utc>>,
}

impl StatementWindow {
  pub fn all_time() -> Self {
    Self::default()
  }

  pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
    Self {
      from: Some(from),
      to: Some(to),
    }
  }

  pub fn validate(&self) -> SettlementResult<()> {
    match (self.from, self.to) {
      (Some(from), Some(to)) if from > to => Err(SettlementError::InvalidRequest(format!(
        "statement window starts after it ends ({} > {})",
        from, to
      ))),
      _ => Ok(()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementStatement {
  pub vendor_id: VendorId,
  pub vendor_name: String,
  pub commission_rate: Decimal,
  pub window: StatementWindow,
  pub total_revenue: Decimal,
  pub commission_amount: Decimal,
  pub net_payable: Decimal,
  pub items: Vec<CompletedItem>,
  pub generated_at: DateTime<Utc>,
}

/// `revenue × rate / 100`, rounded to cents half away from zero.
pub fn commission_for(revenue: Decimal, rate: Decimal) -> SettlementResult<Decimal> {
  revenue
    .checked_mul(rate)
    .and_then(|gross| gross.checked_div(Decimal::ONE_HUNDRED))
    .map(|c| c.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    .ok_or_else(|| out_of_range("commission"))
}

pub fn build_statement(
  vendor: &Vendor,
  window: StatementWindow,
  items: Vec<CompletedItem>,
) -> SettlementResult<SettlementStatement> {
  let total_revenue = checked_sum(items.iter().map(|c| c.item.total_price), "statement revenue")?;
  let commission_amount = commission_for(total_revenue, vendor.commission_rate)?;
  let net_payable = total_revenue
    .checked_sub(commission_amount)
    .ok_or_else(|| out_of_range("net payable"))?;
  Ok(SettlementStatement {
    vendor_id: vendor.id,
    vendor_name: vendor.name.clone(),
    commission_rate: vendor.commission_rate,
    window,
    total_revenue,
    commission_amount,
    net_payable,
    items,
    generated_at: Utc::now(),
  })
}

#[derive(Clone)]
pub struct SettlementService {
  orders: Arc<dyn OrderStore>,
  vendors: Arc<dyn VendorStore>,
}

impl SettlementService {
  pub fn new(orders: Arc<dyn OrderStore>, vendors: Arc<dyn VendorStore>) -> Self {
    Self { orders, vendors }
  }

  async fn statement_for(&self, vendor: &Vendor, window: StatementWindow) -> SettlementResult<SettlementStatement> {
    let items = self
      .orders
      .completed_vendor_items(vendor.id, window.from, window.to)
      .await?;
    build_statement(vendor, window, items)
  }

  #[instrument(
    name = "SettlementService::compute_statement",
    skip(self, caller),
    fields(caller = %caller.user_id, vendor_id = %vendor_id)
  )]
  pub async fn compute_statement(
    &self,
    caller: &Caller,
    vendor_id: VendorId,
    window: StatementWindow,
  ) -> SettlementResult<SettlementStatement> {
    if !caller.may_view_vendor(vendor_id) {
      warn!("Statement request for a vendor the caller does not own.");
      return Err(SettlementError::Unauthorized(
        "only an admin or the vendor itself may view this statement".to_string(),
      ));
    }
    window.validate()?;

    let vendor = self
      .vendors
      .find_vendor(vendor_id)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("vendor {}", vendor_id)))?;
    let statement = self.statement_for(&vendor, window).await?;
    info!(
      revenue = %statement.total_revenue,
      commission = %statement.commission_amount,
      items = statement.items.len(),
      "Settlement statement computed."
    );
    Ok(statement)
  }

  /// One statement per known vendor, computed concurrently.
  #[instrument(name = "SettlementService::compute_all_statements", skip(self, caller), fields(caller = %caller.user_id))]
  pub async fn compute_all_statements(
    &self,
    caller: &Caller,
    window: StatementWindow,
  ) -> SettlementResult<Vec<SettlementStatement>> {
    caller.require_admin("computing statements for all vendors")?;
    window.validate()?;

    let vendors = self.vendors.list_vendors().await?;
    let statements = try_join_all(vendors.iter().map(|vendor| self.statement_for(vendor, window))).await?;
    info!(vendors = statements.len(), "All vendor statements computed.");
    Ok(statements)
  }

  #[instrument(
    name = "SettlementService::set_commission_rate",
    skip(self, caller),
    fields(caller = %caller.user_id, vendor_id = %vendor_id, rate = %rate)
  )]
  pub async fn set_commission_rate(&self, caller: &Caller, vendor_id: VendorId, rate: Decimal) -> SettlementResult<Vendor> {
    caller.require_admin("changing a commission rate")?;
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
      return Err(SettlementError::InvalidRequest(format!(
        "commission rate must be between 0 and 100, got {}",
        rate
      )));
    }
    let vendor = self
      .vendors
      .set_commission_rate(vendor_id, rate)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("vendor {}", vendor_id)))?;
    info!("Commission rate updated.");
    Ok(vendor)
  }

  #[instrument(
    name = "SettlementService::set_vendor_blocked",
    skip(self, caller),
    fields(caller = %caller.user_id, vendor_id = %vendor_id)
  )]
  pub async fn set_vendor_blocked(&self, caller: &Caller, vendor_id: VendorId, blocked: bool) -> SettlementResult<Vendor> {
    caller.require_admin("blocking or unblocking a vendor")?;
    let vendor = self
      .vendors
      .set_blocked(vendor_id, blocked)
      .await?
      .ok_or_else(|| SettlementError::NotFound(format!("vendor {}", vendor_id)))?;
    info!("Vendor block flag updated.");
    Ok(vendor)
  }
}
