// core/src/barcode.rs

//! Human-readable order identifiers: `MG-<year>-<6 chars>`.
//!
//! The alphabet leaves out `0`, `O`, `1` and `I` so a barcode can be read
//! aloud or typed from a printed label.

use crate::error::SettlementResult;
use crate::store::OrderStore;
use chrono::{Datelike, Utc};
use rand::Rng;
use tracing::{debug, warn};

pub const BARCODE_PREFIX: &str = "MG";
pub const BARCODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const BARCODE_SUFFIX_LEN: usize = 6;
pub const DEFAULT_BARCODE_ATTEMPTS: usize = 20;

/// Produces barcode candidates. Uniqueness is checked by the caller.
pub trait BarcodeSource: Send + Sync {
  fn next_candidate(&self) -> String;
}

/// Uniformly random candidates for the current year.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBarcodes;

impl BarcodeSource for RandomBarcodes {
  fn next_candidate(&self) -> String {
    generate_barcode()
  }
}

pub fn generate_barcode() -> String {
  let mut rng = rand::thread_rng();
  let suffix: String = (0..BARCODE_SUFFIX_LEN)
    .map(|_| BARCODE_ALPHABET[rng.gen_range(0..BARCODE_ALPHABET.len())] as char)
    .collect();
  format!("{}-{}-{}", BARCODE_PREFIX, Utc::now().year(), suffix)
}

/// `MG-<year>-T<base-36 microseconds since the epoch>`.
pub fn fallback_barcode() -> String {
  let now = Utc::now();
  let micros = u64::try_from(now.timestamp_micros()).unwrap_or_default();
  format!("{}-{}-T{}", BARCODE_PREFIX, now.year(), to_base36(micros))
}

fn to_base36(mut value: u64) -> String {
  const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
  if value == 0 {
    return "0".to_string();
  }
  let mut out = Vec::new();
  while value > 0 {
    out.push(DIGITS[(value % 36) as usize]);
    value /= 36;
  }
  out.reverse();
  String::from_utf8_lossy(&out).into_owned()
}

/// Returns the first candidate not yet used by any persisted order, trying at
/// most `attempts` candidates before falling back to a timestamp barcode.
pub async fn ensure_unique_barcode(
  store: &dyn OrderStore,
  source: &dyn BarcodeSource,
  attempts: usize,
) -> SettlementResult<String> {
  for attempt in 1..=attempts {
    let candidate = source.next_candidate();
    if !store.barcode_exists(&candidate).await? {
      return Ok(candidate);
    }
    debug!(attempt, barcode = %candidate, "Barcode candidate already taken.");
  }
  let fallback = fallback_barcode();
  warn!(attempts, barcode = %fallback, "Barcode candidates exhausted; using timestamp fallback.");
  Ok(fallback)
}

/// True when `barcode` has the random `MG-<year>-<6 chars>` shape.
pub fn is_well_formed(barcode: &str) -> bool {
  let mut parts = barcode.splitn(3, '-');
  let (Some(prefix), Some(year), Some(suffix)) = (parts.next(), parts.next(), parts.next()) else {
    return false;
  };
  prefix == BARCODE_PREFIX
    && year.len() == 4
    && year.bytes().all(|b| b.is_ascii_digit())
    && suffix.len() == BARCODE_SUFFIX_LEN
    && suffix.bytes().all(|b| BARCODE_ALPHABET.contains(&b))
}
