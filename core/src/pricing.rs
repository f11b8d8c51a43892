// core/src/pricing.rs

//! Cart pricing: subtotal, shipping fee and grand total under a
//! free-shipping threshold. Pure and deterministic.
//!
//! The grand total is advisory; the persisted order total is recomputed at
//! checkout from the server-side item list.

use crate::error::{SettlementError, SettlementResult};
use crate::model::{CartLine, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest accepted line total (one trillion). Client-supplied amounts above
/// it are malformed requests.
pub const MAX_LINE_TOTAL: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
  pub free_shipping_threshold: Decimal,
  pub base_shipping_cost: Decimal,
}

impl PricingPolicy {
  pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);
  pub const DEFAULT_BASE_SHIPPING_COST: Decimal = Decimal::from_parts(150, 0, 0, false, 0);
}

impl Default for PricingPolicy {
  fn default() -> Self {
    Self {
      free_shipping_threshold: Self::DEFAULT_FREE_SHIPPING_THRESHOLD,
      base_shipping_cost: Self::DEFAULT_BASE_SHIPPING_COST,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPricing {
  pub total_amount: Decimal,
  pub total_count: i64,
  pub has_free_shipping: bool,
  pub shipping_cost: Decimal,
  pub remaining_for_free_shipping: Decimal,
  pub grand_total: Decimal,
}

pub(crate) fn out_of_range(what: &str) -> SettlementError {
  SettlementError::InvalidRequest(format!("{} out of range", what))
}

/// Sums money amounts, failing with `InvalidRequest` instead of overflowing.
pub fn checked_sum<I>(amounts: I, what: &str) -> SettlementResult<Decimal>
where
  I: IntoIterator<Item = Decimal>,
{
  amounts
    .into_iter()
    .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
    .ok_or_else(|| out_of_range(what))
}

pub fn check_line_total(product_id: ProductId, total_price: Decimal) -> SettlementResult<()> {
  if total_price.abs() > MAX_LINE_TOTAL {
    return Err(SettlementError::InvalidRequest(format!(
      "line total for product {} out of range (limit {})",
      product_id, MAX_LINE_TOTAL
    )));
  }
  Ok(())
}

/// Fails with `InvalidRequest` when a line total exceeds `MAX_LINE_TOTAL` or
/// a sum leaves the representable range.
pub fn compute_cart_pricing(lines: &[CartLine], policy: &PricingPolicy) -> SettlementResult<CartPricing> {
  for line in lines {
    check_line_total(line.product_id, line.total_price)?;
  }
  let total_amount = checked_sum(lines.iter().map(|line| line.total_price), "cart total")?;
  let total_count = lines
    .iter()
    .try_fold(0i64, |acc, line| acc.checked_add(line.quantity))
    .ok_or_else(|| out_of_range("cart item count"))?;

  let has_free_shipping = total_amount >= policy.free_shipping_threshold;
  let shipping_cost = if has_free_shipping {
    Decimal::ZERO
  } else {
    policy.base_shipping_cost
  };
  let remaining_for_free_shipping = policy
    .free_shipping_threshold
    .checked_sub(total_amount)
    .ok_or_else(|| out_of_range("remaining for free shipping"))?
    .max(Decimal::ZERO);
  let grand_total = total_amount
    .checked_add(shipping_cost)
    .ok_or_else(|| out_of_range("grand total"))?;

  Ok(CartPricing {
    total_amount,
    total_count,
    has_free_shipping,
    shipping_cost,
    remaining_for_free_shipping,
    grand_total,
  })
}
