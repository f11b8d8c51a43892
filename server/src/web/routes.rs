// server/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{admin_handlers, checkout_handlers, order_handlers, pricing_handlers, statement_handlers};

async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "status": "ok",
    "db_connections": app_state.db_pool.size(),
    "order_transitions": app_state.config.engine.transitions,
  }))
}

/// Malformed JSON bodies become `InvalidRequest` responses in the app's error shape.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .route(
        "/cart/pricing",
        web::post().to(pricing_handlers::cart_pricing_handler),
      )
      .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
      )
      .route("/track/{barcode}", web::get().to(order_handlers::track_handler))
      .service(
        web::scope("/admin")
          .route(
            "/orders/{order_id}/status",
            web::put().to(admin_handlers::set_status_handler),
          )
          .route(
            "/orders/{order_id}/tracking",
            web::put().to(admin_handlers::set_tracking_handler),
          )
          .route("/scan/{barcode}", web::post().to(admin_handlers::scan_handler))
          .route(
            "/vendors/{vendor_id}/commission",
            web::put().to(admin_handlers::set_commission_handler),
          )
          .route(
            "/vendors/{vendor_id}/blocked",
            web::put().to(admin_handlers::set_blocked_handler),
          )
          .route("/statements", web::get().to(admin_handlers::all_statements_handler)),
      )
      .route(
        "/vendors/{vendor_id}/statement",
        web::get().to(statement_handlers::vendor_statement_handler),
      ),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::web::extractors::{USER_ID_HEADER, USER_ROLE_HEADER, VENDOR_ID_HEADER};
  use actix_web::http::StatusCode;
  use actix_web::{test, App};
  use order_settlement::{Address, Engine, EngineConfig, InMemoryStore, Vendor};
  use rust_decimal::Decimal;
  use serde_json::Value;
  use sqlx::postgres::PgPoolOptions;
  use std::sync::Arc;
  use uuid::Uuid;

  struct Fixture {
    state: AppState,
    admin: Uuid,
    buyer: Uuid,
    address: Address,
    vendor: Vendor,
    vendor_product: Uuid,
    platform_product: Uuid,
  }

  // The pool is never connected: handlers here run against the in-memory store.
  fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let buyer = Uuid::new_v4();
    let address = store.add_address(buyer, "Ada Buyer");
    let vendor = store.add_vendor("Print Shop", Decimal::new(20, 1));
    let vendor_product = store.add_product("Poster A2", Some(vendor.id));
    let platform_product = store.add_product("Gift Card", None);

    let config = AppConfig::from_lookup(|name| match name {
      "DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
      _ => None,
    })
    .unwrap();
    let db_pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
    let engine = Engine::new(Arc::new(store), EngineConfig::default(), None);

    Fixture {
      state: AppState {
        db_pool,
        engine: Arc::new(engine),
        config: Arc::new(config),
      },
      admin: Uuid::new_v4(),
      buyer,
      address,
      vendor,
      vendor_product,
      platform_product,
    }
  }

  macro_rules! app {
    ($fx:expr) => {
      test::init_service(
        App::new()
          .app_data(web::Data::new($fx.state.clone()))
          .app_data(json_config())
          .app_data(query_config())
          .configure(configure_app_routes),
      )
      .await
    };
  }

  fn money(v: &Value) -> Decimal {
    v.as_str().unwrap().parse().unwrap()
  }

  fn checkout_body(fx: &Fixture) -> Value {
    json!({
      "address_id": fx.address.id,
      "items": [
        {"product_id": fx.vendor_product, "quantity": 2, "unit_price": "50", "total_price": "100"},
        {"product_id": fx.platform_product, "quantity": 1, "unit_price": 30, "total_price": 30}
      ]
    })
  }

  #[actix_rt::test]
  async fn health_is_public() {
    let fx = fixture();
    let app = app!(fx);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[actix_rt::test]
  async fn cart_pricing_applies_threshold() {
    let fx = fixture();
    let app = app!(fx);
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/pricing")
      .set_json(json!({"items": [
        {"product_id": fx.vendor_product, "quantity": 1, "unit_price": "1500", "total_price": "1500"}
      ]}))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["has_free_shipping"], true);
    assert_eq!(body["total_count"], 1);
  }

  #[actix_rt::test]
  async fn cart_pricing_rejects_out_of_range_totals() {
    let fx = fixture();
    let app = app!(fx);
    let huge = Decimal::MAX.to_string();
    let req = test::TestRequest::post()
      .uri("/api/v1/cart/pricing")
      .set_json(json!({"items": [
        {"product_id": fx.vendor_product, "quantity": 1, "unit_price": huge, "total_price": huge},
        {"product_id": fx.platform_product, "quantity": 1, "unit_price": huge, "total_price": huge}
      ]}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidRequest");
  }

  #[actix_rt::test]
  async fn checkout_then_scan_then_track() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, fx.buyer.to_string()))
      .set_json(checkout_body(&fx))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let placed: Value = test::read_body_json(resp).await;
    assert_eq!(placed["order"]["status"], "PENDING");
    assert_eq!(money(&placed["order"]["total_amount"]), Decimal::from(130));
    let barcode = placed["order"]["barcode"].as_str().unwrap().to_string();
    assert!(barcode.starts_with("MG-"));

    let scan = test::TestRequest::post()
      .uri(&format!("/api/v1/admin/scan/{}", barcode))
      .insert_header((USER_ID_HEADER, fx.admin.to_string()))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, scan).await;
    assert_eq!(outcome["status"], "PROCESSING");

    // Lookup is exact: surrounding whitespace or a different case is another barcode.
    for near_miss in [format!("{}%20", barcode), barcode.to_lowercase()] {
      let scan = test::TestRequest::post()
        .uri(&format!("/api/v1/admin/scan/{}", near_miss))
        .insert_header((USER_ID_HEADER, fx.admin.to_string()))
        .insert_header((USER_ROLE_HEADER, "admin"))
        .to_request();
      let resp = test::call_service(&app, scan).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let track = test::TestRequest::get()
      .uri(&format!("/api/v1/track/{}", barcode))
      .to_request();
    let view: Value = test::call_and_read_body_json(&app, track).await;
    assert_eq!(view["status"], "PROCESSING");
    assert_eq!(view["progress"]["kind"], "bar");
    assert_eq!(view["progress"]["step"], 1);
  }

  #[actix_rt::test]
  async fn checkout_without_identity_is_401() {
    let fx = fixture();
    let app = app!(fx);
    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .set_json(checkout_body(&fx))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[actix_rt::test]
  async fn blocked_vendor_rejects_checkout_with_ids() {
    let fx = fixture();
    let app = app!(fx);

    let block = test::TestRequest::put()
      .uri(&format!("/api/v1/admin/vendors/{}/blocked", fx.vendor.id))
      .insert_header((USER_ID_HEADER, fx.admin.to_string()))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .set_json(json!({"is_blocked": true}))
      .to_request();
    assert_eq!(test::call_service(&app, block).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, fx.buyer.to_string()))
      .set_json(checkout_body(&fx))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VendorBlocked");
    assert_eq!(body["vendor_ids"][0], fx.vendor.id.to_string());
    assert_eq!(body["product_ids"][0], fx.vendor_product.to_string());
  }

  #[actix_rt::test]
  async fn malformed_json_is_400_in_app_shape() {
    let fx = fixture();
    let app = app!(fx);
    let req = test::TestRequest::put()
      .uri(&format!("/api/v1/admin/orders/{}/status", Uuid::new_v4()))
      .insert_header((USER_ID_HEADER, fx.admin.to_string()))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .set_json(json!({"status": "LOST"}))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "InvalidRequest");
  }

  #[actix_rt::test]
  async fn buyer_cannot_set_status() {
    let fx = fixture();
    let app = app!(fx);
    let req = test::TestRequest::put()
      .uri(&format!("/api/v1/admin/orders/{}/status", Uuid::new_v4()))
      .insert_header((USER_ID_HEADER, fx.buyer.to_string()))
      .set_json(json!({"status": "SHIPPED"}))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
  }

  #[actix_rt::test]
  async fn vendor_statement_after_completion() {
    let fx = fixture();
    let app = app!(fx);

    let req = test::TestRequest::post()
      .uri("/api/v1/checkout")
      .insert_header((USER_ID_HEADER, fx.buyer.to_string()))
      .set_json(checkout_body(&fx))
      .to_request();
    let placed: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = placed["order"]["id"].as_str().unwrap().to_string();

    let complete = test::TestRequest::put()
      .uri(&format!("/api/v1/admin/orders/{}/status", order_id))
      .insert_header((USER_ID_HEADER, fx.admin.to_string()))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .set_json(json!({"status": "COMPLETED"}))
      .to_request();
    assert_eq!(test::call_service(&app, complete).await.status(), StatusCode::OK);

    let statement = test::TestRequest::get()
      .uri(&format!("/api/v1/vendors/{}/statement", fx.vendor.id))
      .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
      .insert_header((USER_ROLE_HEADER, "vendor"))
      .insert_header((VENDOR_ID_HEADER, fx.vendor.id.to_string()))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, statement).await;
    assert_eq!(money(&body["total_revenue"]), Decimal::from(100));
    assert_eq!(money(&body["commission_amount"]), Decimal::from(2));
    assert_eq!(money(&body["net_payable"]), Decimal::from(98));

    let text = test::TestRequest::get()
      .uri(&format!("/api/v1/vendors/{}/statement?format=text&width=48", fx.vendor.id))
      .insert_header((USER_ID_HEADER, fx.admin.to_string()))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .to_request();
    let bytes = test::call_and_read_body(&app, text).await;
    let printed = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(printed.contains("NET PAYABLE"));
    assert!(printed.lines().all(|l| l.chars().count() <= 48));
  }

  #[actix_rt::test]
  async fn other_vendor_cannot_read_statement() {
    let fx = fixture();
    let app = app!(fx);
    let req = test::TestRequest::get()
      .uri(&format!("/api/v1/vendors/{}/statement", fx.vendor.id))
      .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
      .insert_header((USER_ROLE_HEADER, "vendor"))
      .insert_header((VENDOR_ID_HEADER, Uuid::new_v4().to_string()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
  }
}
