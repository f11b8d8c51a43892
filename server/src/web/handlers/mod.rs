// server/src/web/handlers/mod.rs

pub mod admin_handlers;
pub mod checkout_handlers;
pub mod order_handlers;
pub mod pricing_handlers;
pub mod statement_handlers;
