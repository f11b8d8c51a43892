// core/src/error.rs
use crate::model::{OrderStatus, ProductId, VendorId};
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the step pipeline itself rather than by a step handler.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Pipeline stopped before step '{step_name}' produced its result")]
  Incomplete { step_name: String },
}

/// Errors reported by persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
  /// The unique constraint on `orders.barcode` rejected the insert.
  #[error("Barcode already taken: {barcode}")]
  DuplicateBarcode { barcode: String },

  #[error("Store backend failure: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

impl StoreError {
  pub fn backend(source: impl Into<AnyhowError>) -> Self {
    StoreError::Backend { source: source.into() }
  }
}

#[derive(Debug, Error)]
pub enum SettlementError {
  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  #[error("Address {address_id} does not belong to the buyer")]
  InvalidAddress { address_id: Uuid },

  #[error("Cart contains products from blocked vendors {vendor_ids:?}")]
  VendorBlocked {
    vendor_ids: Vec<VendorId>,
    product_ids: Vec<ProductId>,
  },

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Transition from {from} to {to} is not allowed")]
  IllegalTransition { from: OrderStatus, to: OrderStatus },

  #[error("Persistence conflict: {0}")]
  PersistenceConflict(String),

  #[error("Storage error: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },

  #[error("Workflow error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },
}

impl SettlementError {
  /// Short machine-readable name of the failure kind.
  pub fn kind(&self) -> &'static str {
    match self {
      SettlementError::InvalidRequest(_) => "InvalidRequest",
      SettlementError::InvalidAddress { .. } => "InvalidAddress",
      SettlementError::VendorBlocked { .. } => "VendorBlocked",
      SettlementError::NotFound(_) => "NotFound",
      SettlementError::Unauthorized(_) => "Unauthorized",
      SettlementError::IllegalTransition { .. } => "IllegalTransition",
      SettlementError::PersistenceConflict(_) => "PersistenceConflict",
      SettlementError::Storage { .. } => "Storage",
      SettlementError::Workflow { .. } => "Workflow",
    }
  }
}

// A duplicate barcode only reaches callers of the store directly; the checkout
// retries it before it ever becomes a SettlementError.
impl From<StoreError> for SettlementError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::DuplicateBarcode { barcode } => {
        SettlementError::PersistenceConflict(format!("barcode {} already exists", barcode))
      }
      StoreError::Backend { source } => SettlementError::Storage { source },
    }
  }
}

pub type SettlementResult<T, E = SettlementError> = std::result::Result<T, E>;
