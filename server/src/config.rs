// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use order_settlement::{EngineConfig, PricingPolicy, TransitionPolicy};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub engine: EngineConfig,
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
    None => Ok(default),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    // DATABASE_URL is the one variable without a default.
    get_env("DATABASE_URL")?;
    let cfg = Self::from_lookup(|name| get_env(name).ok())?;

    // The database URL may carry credentials; it is not logged.
    tracing::info!(
      host = %cfg.server_host,
      port = cfg.server_port,
      transitions = ?cfg.engine.transitions,
      "Application configuration loaded successfully."
    );
    Ok(cfg)
  }

  /// Builds the configuration from any variable lookup, so it can be tested
  /// without touching the process environment.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", lookup("SERVER_PORT"), 8080u16)?;
    let database_url = lookup("DATABASE_URL").unwrap_or_default();
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", lookup("DATABASE_MAX_CONNECTIONS"), 10u32)?;
    let run_migrations = parse_var("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), true)?;

    let defaults = PricingPolicy::default();
    let free_shipping_threshold = parse_var(
      "FREE_SHIPPING_THRESHOLD",
      lookup("FREE_SHIPPING_THRESHOLD"),
      defaults.free_shipping_threshold,
    )?;
    let base_shipping_cost = parse_var::<Decimal>(
      "BASE_SHIPPING_COST",
      lookup("BASE_SHIPPING_COST"),
      defaults.base_shipping_cost,
    )?;
    if free_shipping_threshold.is_sign_negative() || base_shipping_cost.is_sign_negative() {
      return Err(AppError::Config("Shipping amounts must not be negative".to_string()));
    }
    let transitions = parse_var("ORDER_TRANSITIONS", lookup("ORDER_TRANSITIONS"), TransitionPolicy::default())?;

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      run_migrations,
      engine: EngineConfig {
        pricing: PricingPolicy {
          free_shipping_threshold,
          base_shipping_cost,
        },
        transitions,
        ..EngineConfig::default()
      },
    })
  }
}
