//! Live snapshot feeds
//!
//! ```text
//! store broadcast ──> feed task ──> watch (latest snapshot) ──> UI
//!                        │
//!                        └──> status diff ──> mpsc notices (students)
//! ```
//!
//! Each feed is one task that subscribes to a store collection, applies
//! the role scope, sorts newest-first, and publishes the result through
//! a watch channel — late subscribers always get the latest snapshot
//! immediately. The order feed additionally diffs each snapshot through
//! a [`StatusTracker`] owned by the task, so notices are edge-triggered
//! per feed lifetime: restarting the feed (a new sign-in) observes the
//! current state silently.
//!
//! Teardown is cooperative via [`CancellationToken`]; retracking orders
//! cancels and awaits the previous task before spawning the next, so at
//! most one order feed is ever publishing.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shared::{Canteen, Order};

use crate::orders::{StatusNotice, StatusTracker};
use crate::store::{CanteenStore, OrderFilter};

/// Buffered status notices per session
const NOTICE_CHANNEL_CAPACITY: usize = 32;

/// The set of live feeds backing one session
pub struct FeedSet {
    store: Arc<dyn CanteenStore>,
    notices: mpsc::Sender<StatusNotice>,
    canteen_feed: CanteenFeed,
    order_feed: Option<OrderFeed>,
}

impl FeedSet {
    /// Start the canteen feed and hand back the notice receiver
    ///
    /// The order feed starts later, once sign-in resolves the role scope.
    pub fn new(store: Arc<dyn CanteenStore>) -> (Self, mpsc::Receiver<StatusNotice>) {
        let (notice_tx, notice_rx) = mpsc::channel(NOTICE_CHANNEL_CAPACITY);
        let canteen_feed = CanteenFeed::spawn(store.clone());
        let set = Self {
            store,
            notices: notice_tx,
            canteen_feed,
            order_feed: None,
        };
        (set, notice_rx)
    }

    /// Latest canteen snapshot; updated on every store push
    pub fn canteens(&self) -> watch::Receiver<Vec<Canteen>> {
        self.canteen_feed.rx.clone()
    }

    /// (Re)start the order feed under a role scope
    ///
    /// Any previous order feed is cancelled and awaited first. Student
    /// scopes also get status notices; the shopkeeper queue does not.
    pub async fn track_orders(&mut self, filter: OrderFilter) -> watch::Receiver<Vec<Order>> {
        self.stop_orders().await;
        let notices = matches!(filter, OrderFilter::Student(_)).then(|| self.notices.clone());
        let feed = OrderFeed::spawn(self.store.clone(), filter, notices);
        let rx = feed.rx.clone();
        self.order_feed = Some(feed);
        rx
    }

    /// Stop the order feed, if one is running (sign-out)
    pub async fn stop_orders(&mut self) {
        if let Some(feed) = self.order_feed.take() {
            feed.stop().await;
        }
    }

    /// Stop every feed
    pub async fn shutdown(mut self) {
        self.stop_orders().await;
        self.canteen_feed.cancel.cancel();
        let _ = (&mut self.canteen_feed.handle).await;
    }
}

/// One running order feed task
struct OrderFeed {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    rx: watch::Receiver<Vec<Order>>,
}

impl OrderFeed {
    fn spawn(
        store: Arc<dyn CanteenStore>,
        filter: OrderFilter,
        notices: Option<mpsc::Sender<StatusNotice>>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(Vec::new());
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            // Subscribe before the initial fetch so no push is missed
            let mut updates = store.subscribe_orders();
            let mut tracker = StatusTracker::new();

            let initial = store.orders().await;
            // Pushes queued while the fetch was in flight reflect state
            // the fetch already covers; replaying them would rewind the
            // tracker and re-fire notices
            drain_pending(&mut updates);
            publish_orders(&tx, &filter, &mut tracker, notices.as_ref(), initial).await;

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    result = updates.recv() => match result {
                        Ok(snapshot) => {
                            publish_orders(&tx, &filter, &mut tracker, notices.as_ref(), snapshot)
                                .await;
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Order feed lagged, catching up");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("Order feed stopped");
        });
        Self { cancel, handle, rx }
    }

    async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

/// Discard every push already queued on a broadcast receiver
fn drain_pending<T: Clone>(rx: &mut broadcast::Receiver<T>) {
    loop {
        match rx.try_recv() {
            Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

/// Scope, sort and publish one order snapshot, surfacing status changes
async fn publish_orders(
    tx: &watch::Sender<Vec<Order>>,
    filter: &OrderFilter,
    tracker: &mut StatusTracker,
    notices: Option<&mpsc::Sender<StatusNotice>>,
    mut snapshot: Vec<Order>,
) {
    snapshot.retain(|order| filter.matches(order));
    snapshot.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if let Some(sender) = notices {
        for notice in tracker.diff(&snapshot) {
            // Receiver gone means the session is tearing down
            if sender.send(notice).await.is_err() {
                break;
            }
        }
    }
    let _ = tx.send(snapshot);
}

/// One running canteen feed task
struct CanteenFeed {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    rx: watch::Receiver<Vec<Canteen>>,
}

impl CanteenFeed {
    fn spawn(store: Arc<dyn CanteenStore>) -> Self {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(Vec::new());
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut updates = store.subscribe_canteens();
            let initial = store.canteens().await;
            drain_pending(&mut updates);
            let _ = tx.send(initial);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    result = updates.recv() => match result {
                        Ok(snapshot) => {
                            let _ = tx.send(snapshot);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Canteen feed lagged, catching up");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("Canteen feed stopped");
        });
        Self { cancel, handle, rx }
    }
}

impl Drop for FeedSet {
    fn drop(&mut self) {
        self.canteen_feed.cancel.cancel();
        if let Some(feed) = &self.order_feed {
            feed.cancel.cancel();
        }
    }
}
