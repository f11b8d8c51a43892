// server/src/web/handlers/statement_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use order_settlement::statement_print::DEFAULT_WIDTH;
use order_settlement::{render_statement, StatementWindow};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCaller;

const MAX_TEXT_WIDTH: usize = 160;

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
  #[default]
  Json,
  Text,
}

/// `from` is inclusive and `to` exclusive, both RFC 3339.
#[derive(Deserialize, Debug, Default)]
pub struct WindowQuery {
  pub from: Option<DateTime<Utc>>,
  pub to: Option<DateTime<Utc>>,
}

impl WindowQuery {
  pub fn window(&self) -> StatementWindow {
    StatementWindow {
      from: self.from,
      to: self.to,
    }
  }
}

#[derive(Deserialize, Debug, Default)]
pub struct StatementQuery {
  pub from: Option<DateTime<Utc>>,
  pub to: Option<DateTime<Utc>>,
  #[serde(default)]
  pub format: StatementFormat,
  pub width: Option<usize>,
}

#[instrument(name = "handler::vendor_statement", skip(app_state, caller), fields(caller = %caller.0.user_id))]
pub async fn vendor_statement_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  query: web::Query<StatementQuery>,
  caller: AuthenticatedCaller,
) -> Result<HttpResponse, AppError> {
  let statement = app_state
    .engine
    .settlement
    .compute_statement(
      &caller.0,
      path.into_inner(),
      StatementWindow {
        from: query.from,
        to: query.to,
      },
    )
    .await?;

  match query.format {
    StatementFormat::Json => Ok(HttpResponse::Ok().json(statement)),
    StatementFormat::Text => {
      let width = query.width.unwrap_or(DEFAULT_WIDTH).min(MAX_TEXT_WIDTH);
      Ok(
        HttpResponse::Ok()
          .content_type("text/plain; charset=utf-8")
          .body(render_statement(&statement, width)),
      )
    }
  }
}
