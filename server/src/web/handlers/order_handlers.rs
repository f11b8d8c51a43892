// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use order_settlement::{progress, Order, ProgressView};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

/// An order as its owner sees it, with the fulfillment progress.
#[derive(Serialize, Debug)]
pub struct OrderDetail {
  #[serde(flatten)]
  pub order: Order,
  pub progress: ProgressView,
}

impl From<Order> for OrderDetail {
  fn from(order: Order) -> Self {
    let progress = progress(order.status);
    Self { order, progress }
  }
}

#[instrument(name = "handler::list_orders", skip(app_state, caller), fields(caller = %caller.0.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.engine.fulfillment.list_orders(&caller.0).await?;
  let details: Vec<OrderDetail> = orders.into_iter().map(OrderDetail::from).collect();
  Ok(HttpResponse::Ok().json(details))
}

#[instrument(name = "handler::get_order", skip(app_state, caller), fields(caller = %caller.0.user_id))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.engine.fulfillment.get_order(&caller.0, order_id).await?;
  Ok(HttpResponse::Ok().json(OrderDetail::from(order)))
}

/// Public: anyone holding the barcode may follow the shipment.
#[instrument(name = "handler::track", skip(app_state))]
pub async fn track_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let view = app_state.engine.fulfillment.track(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(view))
}
