// server/src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use order_settlement::OrderStatus;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;
use crate::web::handlers::statement_handlers::WindowQuery;

#[derive(Deserialize, Debug)]
pub struct StatusRequestPayload {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug)]
pub struct TrackingRequestPayload {
  #[serde(default)]
  pub shipping_carrier: Option<String>,
  #[serde(default)]
  pub tracking_number: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct CommissionRequestPayload {
  pub commission_rate: Decimal,
}

#[derive(Deserialize, Debug)]
pub struct BlockedRequestPayload {
  pub is_blocked: bool,
}

#[instrument(
    name = "handler::set_order_status",
    skip(app_state, req_payload, caller),
    fields(caller = %caller.0.user_id, status = %req_payload.status)
)]
pub async fn set_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<StatusRequestPayload>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let order = app_state
    .engine
    .fulfillment
    .set_status(&caller.0, path.into_inner(), req_payload.status)
    .await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::set_tracking", skip(app_state, req_payload, caller), fields(caller = %caller.0.user_id))]
pub async fn set_tracking_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<TrackingRequestPayload>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let order = app_state
    .engine
    .fulfillment
    .set_tracking(&caller.0, path.into_inner(), payload.shipping_carrier, payload.tracking_number)
    .await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::scan", skip(app_state, caller), fields(caller = %caller.0.user_id))]
pub async fn scan_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let barcode = path.into_inner();
  let outcome = app_state
    .engine
    .fulfillment
    .scan_to_processing(&caller.0, &barcode)
    .await?;
  info!(barcode = %outcome.barcode, previous = %outcome.previous_status, "Scan processed.");
  Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(
    name = "handler::set_commission",
    skip(app_state, req_payload, caller),
    fields(caller = %caller.0.user_id, rate = %req_payload.commission_rate)
)]
pub async fn set_commission_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<CommissionRequestPayload>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let vendor = app_state
    .engine
    .settlement
    .set_commission_rate(&caller.0, path.into_inner(), req_payload.commission_rate)
    .await?;
  Ok(HttpResponse::Ok().json(vendor))
}

#[instrument(
    name = "handler::set_vendor_blocked",
    skip(app_state, req_payload, caller),
    fields(caller = %caller.0.user_id, is_blocked = req_payload.is_blocked)
)]
pub async fn set_blocked_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<BlockedRequestPayload>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let vendor = app_state
    .engine
    .settlement
    .set_vendor_blocked(&caller.0, path.into_inner(), req_payload.is_blocked)
    .await?;
  Ok(HttpResponse::Ok().json(vendor))
}

#[instrument(name = "handler::all_statements", skip(app_state, caller), fields(caller = %caller.0.user_id))]
pub async fn all_statements_handler(
  app_state: web::Data<AppState>,
  query: web::Query<WindowQuery>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let statements = app_state
    .engine
    .settlement
    .compute_all_statements(&caller.0, query.window())
    .await?;
  Ok(HttpResponse::Ok().json(statements))
}
