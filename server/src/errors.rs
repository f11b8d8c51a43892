// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use order_settlement::SettlementError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Missing or malformed caller identity.
  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error(transparent)]
  Settlement(#[from] SettlementError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<SettlementError>() {
      Ok(settlement) => AppError::Settlement(settlement),
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(db) => AppError::Sqlx(db),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

fn settlement_status(err: &SettlementError) -> StatusCode {
  match err {
    SettlementError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    SettlementError::InvalidAddress { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    SettlementError::VendorBlocked { .. } => StatusCode::CONFLICT,
    SettlementError::NotFound(_) => StatusCode::NOT_FOUND,
    SettlementError::Unauthorized(_) => StatusCode::FORBIDDEN,
    SettlementError::IllegalTransition { .. } => StatusCode::CONFLICT,
    SettlementError::PersistenceConflict(_) => StatusCode::CONFLICT,
    SettlementError::Storage { .. } | SettlementError::Workflow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Settlement(err) => settlement_status(err),
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }

    let body = match self {
      AppError::Validation(m) => json!({"error": "InvalidRequest", "detail": m}),
      AppError::Auth(m) => json!({"error": "Unauthenticated", "detail": m}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
      AppError::Settlement(err) => match err {
        SettlementError::VendorBlocked {
          vendor_ids,
          product_ids,
        } => json!({
          "error": err.kind(),
          "detail": err.to_string(),
          "vendor_ids": vendor_ids,
          "product_ids": product_ids,
        }),
        SettlementError::InvalidAddress { address_id } => json!({
          "error": err.kind(),
          "detail": err.to_string(),
          "address_id": address_id,
        }),
        // Backend details stay in the logs.
        SettlementError::Storage { .. } => json!({"error": err.kind(), "detail": "Storage failure"}),
        _ => json!({"error": err.kind(), "detail": err.to_string()}),
      },
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;
  use order_settlement::OrderStatus;
  use uuid::Uuid;

  async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let resp = err.error_response();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[actix_rt::test]
  async fn vendor_blocked_lists_offending_ids() {
    let vendor = Uuid::new_v4();
    let product = Uuid::new_v4();
    let (status, body) = body_json(AppError::from(SettlementError::VendorBlocked {
      vendor_ids: vec![vendor],
      product_ids: vec![product],
    }))
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "VendorBlocked");
    assert_eq!(body["vendor_ids"][0], vendor.to_string());
    assert_eq!(body["product_ids"][0], product.to_string());
  }

  #[actix_rt::test]
  async fn settlement_kinds_map_to_statuses() {
    let cases = vec![
      (SettlementError::InvalidRequest("empty".into()), StatusCode::BAD_REQUEST),
      (
        SettlementError::InvalidAddress {
          address_id: Uuid::new_v4(),
        },
        StatusCode::UNPROCESSABLE_ENTITY,
      ),
      (SettlementError::NotFound("order".into()), StatusCode::NOT_FOUND),
      (SettlementError::Unauthorized("admin only".into()), StatusCode::FORBIDDEN),
      (
        SettlementError::IllegalTransition {
          from: OrderStatus::Completed,
          to: OrderStatus::Pending,
        },
        StatusCode::CONFLICT,
      ),
      (SettlementError::PersistenceConflict("barcode".into()), StatusCode::CONFLICT),
      (
        SettlementError::Storage {
          source: anyhow::anyhow!("connection reset"),
        },
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, expected) in cases {
      let kind = err.kind();
      let (status, body) = body_json(AppError::from(err)).await;
      assert_eq!(status, expected, "{}", kind);
      assert_eq!(body["error"], kind);
    }
  }

  #[actix_rt::test]
  async fn storage_details_are_not_leaked() {
    let (_, body) = body_json(AppError::from(SettlementError::Storage {
      source: anyhow::anyhow!("password authentication failed for user shop"),
    }))
    .await;
    assert!(!body.to_string().contains("password"));
  }

  #[actix_rt::test]
  async fn missing_identity_is_401() {
    let (status, body) = body_json(AppError::Auth("no X-User-ID".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated");
  }

  #[test]
  fn anyhow_wrapping_a_settlement_error_keeps_its_kind() {
    let err = AppError::from(anyhow::Error::new(SettlementError::NotFound("vendor".into())));
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
  }
}
