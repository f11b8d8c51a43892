// server/src/web/extractors.rs

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use order_settlement::Caller;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";
pub const VENDOR_ID_HEADER: &str = "X-Vendor-ID";

/// Caller identity taken from headers set by the upstream auth gateway.
///
/// `X-User-ID` is required. `X-User-Role` is one of `admin`, `buyer` or
/// `vendor` and defaults to `buyer`; the vendor role also needs `X-Vendor-ID`.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

fn header<'a>(req: &'a HttpRequest, name: &str) -> Result<Option<&'a str>, AppError> {
  match req.headers().get(name) {
    Some(value) => value
      .to_str()
      .map(|s| Some(s.trim()))
      .map_err(|_| AppError::Auth(format!("{} header is not valid text", name))),
    None => Ok(None),
  }
}

fn uuid_header(req: &HttpRequest, name: &str) -> Result<Uuid, AppError> {
  let raw = header(req, name)?.ok_or_else(|| AppError::Auth(format!("Missing {} header", name)))?;
  Uuid::parse_str(raw).map_err(|_| AppError::Auth(format!("{} header is not a valid UUID", name)))
}

fn caller_from(req: &HttpRequest) -> Result<Caller, AppError> {
  let user_id = uuid_header(req, USER_ID_HEADER)?;
  let role = header(req, USER_ROLE_HEADER)?.map(str::to_ascii_lowercase);
  match role.as_deref() {
    None | Some("buyer") => Ok(Caller::buyer(user_id)),
    Some("admin") => Ok(Caller::admin(user_id)),
    Some("vendor") => Ok(Caller::vendor(user_id, uuid_header(req, VENDOR_ID_HEADER)?)),
    Some(other) => Err(AppError::Auth(format!("Unknown role '{}'", other))),
  }
}

impl FromRequest for AuthenticatedCaller {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(caller_from(req).map(AuthenticatedCaller).map_err(|e| {
      warn!(error = %e, path = %req.path(), "Rejected request without a usable caller identity.");
      e
    }))
  }
}
