//! Order Tracking
//!
//! Keeps a placed order's progress current by polling the catalog. Polled
//! progress only ever moves forward.

use std::{fmt, sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::AbortHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, warn};

use crate::{
    catalog::{CatalogError, CatalogSource},
    orders::{OrderRecord, progress::OrderProgress},
};

/// Follows one order.
pub struct OrderTracker {
    catalog: Arc<dyn CatalogSource>,
    order: OrderRecord,
}

impl fmt::Debug for OrderTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderTracker")
            .field("order", &self.order.id)
            .field("percent", &self.order.percent)
            .finish_non_exhaustive()
    }
}

impl OrderTracker {
    /// Track `order`, refreshing it from `catalog`.
    pub fn new(catalog: Arc<dyn CatalogSource>, order: OrderRecord) -> Self {
        Self { catalog, order }
    }

    /// The latest accepted state of the order.
    pub fn order(&self) -> &OrderRecord {
        &self.order
    }

    /// Progress of the latest accepted state.
    pub fn progress(&self) -> OrderProgress {
        self.order.progress()
    }

    /// Merge a newer snapshot of the order, returning whether anything changed.
    ///
    /// A lower percentage than already seen keeps the previous one, and a
    /// delivered order accepts no further updates.
    pub fn apply(&mut self, mut update: OrderRecord) -> bool {
        if update.id != self.order.id {
            warn!(tracked = %self.order.id, received = %update.id, "ignoring update for another order");

            return false;
        }

        if !self.order.is_active() {
            return false;
        }

        if update.is_active() && update.percent < self.order.percent {
            warn!(
                order = %self.order.id,
                current = self.order.percent,
                received = update.percent,
                "ignoring progress regression"
            );

            update.percent = self.order.percent;
        }

        if update == self.order {
            return false;
        }

        debug!(order = %update.id, percent = update.percent, status = ?update.status, "order progressed");

        self.order = update;

        true
    }

    /// Fetch the order once and merge it.
    ///
    /// # Errors
    ///
    /// Returns the catalog error if the fetch fails; the tracked order is
    /// left as it was.
    pub async fn refresh(&mut self) -> Result<bool, CatalogError> {
        let update = self.catalog.fetch_order(self.order.id.clone()).await?;

        Ok(self.apply(update))
    }

    /// Poll every `period` until the order is delivered.
    ///
    /// Dropping the returned handle stops polling.
    pub fn spawn_polling(mut self, period: Duration) -> PollingHandle {
        let (sender, updates) = watch::channel(self.order.clone());

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick completes immediately and the snapshot is already current.
            ticker.tick().await;

            while self.order.is_active() {
                ticker.tick().await;

                match self.refresh().await {
                    Ok(true) => {
                        sender.send_replace(self.order.clone());
                    }
                    Ok(false) => {}
                    Err(error) => warn!(order = %self.order.id, %error, "order refresh failed"),
                }

                if sender.is_closed() {
                    return;
                }
            }

            info!(order = %self.order.id, "order delivered, polling stopped");
        });

        PollingHandle {
            updates,
            task: task.abort_handle(),
        }
    }
}

/// A running poll started by [`OrderTracker::spawn_polling`].
#[derive(Debug)]
pub struct PollingHandle {
    updates: watch::Receiver<OrderRecord>,
    task: AbortHandle,
}

impl PollingHandle {
    /// Receiver notified on every accepted update.
    pub fn subscribe(&self) -> watch::Receiver<OrderRecord> {
        self.updates.clone()
    }

    /// The latest accepted state.
    pub fn latest(&self) -> OrderRecord {
        self.updates.borrow().clone()
    }

    /// Stop polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
