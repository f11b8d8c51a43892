// server/src/state.rs

use crate::config::AppConfig;
use order_settlement::Engine;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub engine: Arc<Engine>,
  pub config: Arc<AppConfig>,
}
