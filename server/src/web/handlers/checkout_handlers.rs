// server/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use order_settlement::CheckoutItem;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  /// Defaults to the caller. Only an admin may order for someone else.
  #[serde(default)]
  pub buyer_id: Option<Uuid>,
  #[serde(default)]
  pub address_id: Option<Uuid>,
  #[serde(default)]
  pub items: Vec<CheckoutItem>,
}

#[instrument(
    name = "handler::checkout",
    skip(app_state, req_payload, caller),
    fields(caller = %caller.0.user_id, item_count = req_payload.items.len())
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let AuthenticatedCaller(caller) = caller;
  let payload = req_payload.into_inner();
  let buyer_id = payload.buyer_id.unwrap_or(caller.user_id);

  let placed = app_state
    .engine
    .checkout
    .create_order(caller, buyer_id, payload.address_id, payload.items)
    .await?;

  info!(order_id = %placed.order.id, barcode = %placed.order.barcode, "Checkout completed.");
  Ok(HttpResponse::Created().json(placed))
}
