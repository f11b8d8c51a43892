// core/src/model/cart.rs

//! Client-held cart lines and checkout line input.
//!
//! Prices and quantities arrive from the client, so decoding is lenient: a
//! price that is not a number (or a numeric string) decodes as zero, and a
//! quantity that is not a number decodes as zero before being clamped.

use super::{ItemOptions, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// One line of a buyer's cart. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub product_id: ProductId,
  #[serde(deserialize_with = "lenient_quantity", default)]
  pub quantity: i64,
  #[serde(deserialize_with = "lenient_decimal", default)]
  pub unit_price: Decimal,
  #[serde(deserialize_with = "lenient_decimal", default)]
  pub total_price: Decimal,
  #[serde(default)]
  pub options: ItemOptions,
}

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
  pub product_id: ProductId,
  #[serde(deserialize_with = "lenient_quantity", default)]
  pub quantity: i64,
  #[serde(deserialize_with = "lenient_decimal", default)]
  pub unit_price: Decimal,
  #[serde(deserialize_with = "lenient_decimal", default)]
  pub total_price: Decimal,
  #[serde(default)]
  pub options: ItemOptions,
  #[serde(default)]
  pub uploaded_file_url: Option<String>,
}

impl CheckoutItem {
  /// Quantity clamped into `1..=i32::MAX`.
  pub fn normalized_quantity(&self) -> i32 {
    self.quantity.clamp(1, i64::from(i32::MAX)) as i32
  }
}

impl From<&CheckoutItem> for CartLine {
  fn from(item: &CheckoutItem) -> Self {
    CartLine {
      product_id: item.product_id,
      quantity: item.quantity,
      unit_price: item.unit_price,
      total_price: item.total_price,
      options: item.options.clone(),
    }
  }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
  let text = match value {
    Value::Number(n) => n.to_string(),
    Value::String(s) => s.trim().to_string(),
    _ => return None,
  };
  Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
}

pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  Ok(decimal_from_value(&value).unwrap_or(Decimal::ZERO))
}

pub(crate) fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Value::deserialize(deserializer)?;
  let quantity = match &value {
    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  };
  Ok(quantity.unwrap_or(0))
}
