// server/src/web/handlers/pricing_handlers.rs

use actix_web::{web, HttpResponse};
use order_settlement::CartLine;
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct CartPricingRequestPayload {
  #[serde(default)]
  pub items: Vec<CartLine>,
}

/// Pure calculation over the client-held cart; needs no identity.
#[instrument(name = "handler::cart_pricing", skip(app_state, req_payload), fields(lines = req_payload.items.len()))]
pub async fn cart_pricing_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CartPricingRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let pricing = app_state.engine.price_cart(&req_payload.items)?;
  Ok(HttpResponse::Ok().json(pricing))
}
