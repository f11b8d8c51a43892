// core/src/statement_print.rs

//! Fixed-width plain-text rendering of a settlement statement, for printing
//! or attaching to a payout email. Width is counted in characters.

use crate::settlement::SettlementStatement;
use rust_decimal::Decimal;

pub const MIN_WIDTH: usize = 40;
pub const DEFAULT_WIDTH: usize = 64;

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
  s.chars().take(max_width).collect()
}

/// Pads to exactly `width` characters; longer input is truncated.
pub fn pad_to_width(s: &str, width: usize, align_right: bool) -> String {
  let current = s.chars().count();
  if current >= width {
    return truncate_to_width(s, width);
  }
  let spaces = " ".repeat(width - current);
  if align_right {
    format!("{}{}", spaces, s)
  } else {
    format!("{}{}", s, spaces)
  }
}

struct TextBuilder {
  buf: String,
  width: usize,
}

impl TextBuilder {
  fn new(width: usize) -> Self {
    Self {
      buf: String::new(),
      width,
    }
  }

  fn line(&mut self, s: &str) {
    self.buf.push_str(s.trim_end());
    self.buf.push('\n');
  }

  fn center(&mut self, s: &str) {
    let text = truncate_to_width(s, self.width);
    let left = (self.width - text.chars().count()) / 2;
    self.line(&format!("{}{}", " ".repeat(left), text));
  }

  fn sep(&mut self, c: char) {
    let rule: String = std::iter::repeat(c).take(self.width).collect();
    self.line(&rule);
  }

  /// Label on the left, value flush right.
  fn pair(&mut self, label: &str, value: &str) {
    let value_width = value.chars().count().min(self.width);
    let label_width = self.width - value_width;
    self.line(&format!(
      "{}{}",
      pad_to_width(label, label_width, false),
      pad_to_width(value, value_width, true)
    ));
  }

  fn finish(self) -> String {
    self.buf
  }
}

fn money(amount: Decimal) -> String {
  format!("{:.2}", amount)
}

/// Renders `statement` as lines of at most `width` characters (never fewer
/// than `MIN_WIDTH`).
pub fn render_statement(statement: &SettlementStatement, width: usize) -> String {
  let width = width.max(MIN_WIDTH);
  let mut b = TextBuilder::new(width);

  b.sep('=');
  b.center("SETTLEMENT STATEMENT");
  b.sep('=');
  b.pair("Vendor", &statement.vendor_name);
  b.pair("Vendor ID", &statement.vendor_id.to_string());
  let from = statement
    .window
    .from
    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|| "beginning".to_string());
  let to = statement
    .window
    .to
    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|| "now".to_string());
  b.pair("Period", &format!("{} .. {}", from, to));
  b.pair("Generated", &statement.generated_at.format("%Y-%m-%d %H:%M UTC").to_string());
  b.sep('-');

  // barcode | product | qty | amount
  let barcode_w = 16;
  let qty_w = 5;
  let amount_w = 12;
  let product_w = width - barcode_w - qty_w - amount_w;
  b.line(&format!(
    "{}{}{}{}",
    pad_to_width("Order", barcode_w, false),
    pad_to_width("Product", product_w, false),
    pad_to_width("Qty", qty_w, true),
    pad_to_width("Amount", amount_w, true)
  ));
  b.sep('-');
  if statement.items.is_empty() {
    b.center("(no completed sales in this period)");
  }
  for completed in &statement.items {
    b.line(&format!(
      "{}{}{}{}",
      pad_to_width(&completed.barcode, barcode_w, false),
      pad_to_width(&completed.item.product_name, product_w - 1, false) + " ",
      pad_to_width(&completed.item.quantity.to_string(), qty_w, true),
      pad_to_width(&money(completed.item.total_price), amount_w, true)
    ));
  }
  b.sep('-');

  b.pair("Total revenue", &money(statement.total_revenue));
  b.pair(
    &format!("Commission ({}%)", statement.commission_rate.normalize()),
    &money(statement.commission_amount),
  );
  b.sep('=');
  b.pair("NET PAYABLE", &money(statement.net_payable));
  b.sep('=');

  b.finish()
}
