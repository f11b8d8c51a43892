// server/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod state;
mod web;

use crate::config::AppConfig;
use crate::db::PgStore;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use order_settlement::{Engine, LoggingNotifier, NotificationDispatcher};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

fn init_tracing() {
  let builder = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE);

  // LOG_FORMAT=json for log shippers; human-readable otherwise.
  if std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false) {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  init_tracing();
  tracing::info!("Starting marketplace settlement server...");

  let app_config = AppConfig::from_env().map(Arc::new).map_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
  })?;

  let db_pool = PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect(&app_config.database_url)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "Failed to connect to the database.");
      io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    sqlx::migrate!("./migrations").run(&db_pool).await.map_err(|e| {
      tracing::error!(error = %e, "Database migration failed.");
      io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    tracing::info!("Database migrations applied.");
  }

  let (notifications, _notify_worker) = NotificationDispatcher::spawn(Arc::new(LoggingNotifier));
  let store = Arc::new(PgStore::new(db_pool.clone()));
  let engine = Arc::new(Engine::new(store, app_config.engine, Some(notifications)));
  tracing::info!(steps = ?engine.checkout.step_names(), "Checkout pipeline ready.");

  let app_state = AppState {
    db_pool,
    engine,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .app_data(web::json_config())
      .app_data(web::query_config())
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
