// core/src/config.rs

use crate::barcode::DEFAULT_BARCODE_ATTEMPTS;
use crate::model::OrderStatus;
use crate::pricing::PricingPolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which status moves an admin may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
  /// Any status may be set from any status, including backward moves.
  #[default]
  Permissive,
  /// Only the forward chain, side branches from non-terminal states, and
  /// re-setting the current status.
  ForwardOnly,
}

impl TransitionPolicy {
  pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
    match self {
      TransitionPolicy::Permissive => true,
      TransitionPolicy::ForwardOnly => forward_edge(from, to),
    }
  }

  pub fn allows_scan_from(self, from: OrderStatus) -> bool {
    match self {
      TransitionPolicy::Permissive => true,
      TransitionPolicy::ForwardOnly => matches!(from, OrderStatus::Pending | OrderStatus::Processing),
    }
  }
}

fn forward_edge(from: OrderStatus, to: OrderStatus) -> bool {
  use OrderStatus::*;
  if from == to {
    return true;
  }
  let terminal = matches!(from, Completed | Cancelled | Returned | Refunded);
  match (from, to) {
    (Pending, Processing) | (Processing, Shipped) | (Shipped, Completed) => true,
    (_, Cancelled | Returned | Refunded) => !terminal,
    _ => false,
  }
}

impl FromStr for TransitionPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "permissive" => Ok(TransitionPolicy::Permissive),
      "forward_only" | "forward-only" => Ok(TransitionPolicy::ForwardOnly),
      other => Err(format!("unknown transition policy '{}'", other)),
    }
  }
}

/// Tunables shared by every engine service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
  pub pricing: PricingPolicy,
  pub transitions: TransitionPolicy,
  /// Candidates tried against existing barcodes before the timestamp fallback.
  pub barcode_attempts: usize,
  /// Inserts attempted when the store reports a duplicate barcode.
  pub insert_attempts: usize,
}

impl EngineConfig {
  pub const DEFAULT_INSERT_ATTEMPTS: usize = 5;
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      pricing: PricingPolicy::default(),
      transitions: TransitionPolicy::default(),
      barcode_attempts: DEFAULT_BARCODE_ATTEMPTS,
      insert_attempts: Self::DEFAULT_INSERT_ATTEMPTS,
    }
  }
}
