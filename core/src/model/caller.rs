// core/src/model/caller.rs

use super::{BuyerId, VendorId};
use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "vendor_id", rename_all = "snake_case")]
pub enum Role {
  Admin,
  Buyer,
  Vendor(VendorId),
}

/// An authenticated caller, as resolved by the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id: Uuid,
  pub role: Role,
}

impl Caller {
  pub fn admin(user_id: Uuid) -> Self {
    Caller { user_id, role: Role::Admin }
  }

  pub fn buyer(user_id: BuyerId) -> Self {
    Caller { user_id, role: Role::Buyer }
  }

  pub fn vendor(user_id: Uuid, vendor_id: VendorId) -> Self {
    Caller {
      user_id,
      role: Role::Vendor(vendor_id),
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }

  pub fn require_admin(&self, action: &str) -> Result<(), SettlementError> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(SettlementError::Unauthorized(format!("{} requires the admin role", action)))
    }
  }

  /// Admins act for anyone; a buyer only for themselves.
  pub fn may_act_for_buyer(&self, buyer_id: BuyerId) -> bool {
    match self.role {
      Role::Admin => true,
      Role::Buyer => self.user_id == buyer_id,
      Role::Vendor(_) => false,
    }
  }

  pub fn may_view_vendor(&self, vendor_id: VendorId) -> bool {
    match self.role {
      Role::Admin => true,
      Role::Vendor(own) => own == vendor_id,
      Role::Buyer => false,
    }
  }
}
