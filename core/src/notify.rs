// core/src/notify.rs

//! Fire-and-forget delivery of order events.
//!
//! `NotificationDispatcher::dispatch` only enqueues; a worker task spawned on
//! the current tokio runtime drains the queue and hands each order to the
//! configured `OrderNotifier`. Delivery failures are logged and dropped.

use crate::model::Order;
use crate::store::OrderNotifier;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};

#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
  sender: mpsc::UnboundedSender<Order>,
}

impl NotificationDispatcher {
  /// Must be called from within a tokio runtime.
  pub fn spawn(notifier: Arc<dyn OrderNotifier>) -> (Self, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Order>();
    let worker = tokio::spawn(
      async move {
        while let Some(order) = receiver.recv().await {
          match notifier.order_created(&order).await {
            Ok(()) => debug!(order_id = %order.id, barcode = %order.barcode, "Order notification delivered."),
            Err(e) => warn!(order_id = %order.id, barcode = %order.barcode, error = %e, "Order notification failed."),
          }
        }
        debug!("Notification queue closed; worker exiting.");
      }
      .instrument(info_span!("notification_worker")),
    );
    (Self { sender }, worker)
  }

  /// Returns `false` when the worker is gone and the event was dropped.
  pub fn dispatch(&self, order: Order) -> bool {
    match self.sender.send(order) {
      Ok(()) => true,
      Err(mpsc::error::SendError(order)) => {
        warn!(order_id = %order.id, "Notification worker is not running; event dropped.");
        false
      }
    }
  }
}

/// A notifier that only logs. Used when no outbound channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait::async_trait]
impl OrderNotifier for LoggingNotifier {
  async fn order_created(&self, order: &Order) -> anyhow::Result<()> {
    tracing::info!(
      order_id = %order.id,
      barcode = %order.barcode,
      total = %order.total_amount,
      items = order.items.len(),
      "Order created."
    );
    Ok(())
  }
}
