use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::realtime::event::ChangeEvent;

/// In-process fan-out for reaction change events. Every screen-facing
/// subscriber (SSE streams, the shared aggregator pump) holds a
/// [`FeedSubscription`]; dropping it releases interest, so subscription
/// lifetime is scoped to the consumer on every exit path.
pub struct FeedHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl FeedHub {
    pub fn new(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer);
        Self { tx }
    }

    /// Process-wide hub, sized from config.
    pub fn global() -> &'static FeedHub {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<FeedHub> = OnceLock::new();
        INSTANCE.get_or_init(|| FeedHub::new(crate::config::config().feed.buffer))
    }

    /// Broadcast an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(receivers) => debug!("Feed event delivered to {} subscribers", receivers),
            Err(_) => debug!("Feed event dropped: no subscribers"),
        }
    }

    pub fn subscribe(&self) -> FeedSubscription {
        FeedSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live position in the feed. Lagged gaps are logged and skipped rather
/// than surfaced: consumers are idempotent set updates, and a full refresh
/// path (the bulk load) exists for anyone who fell far behind.
pub struct FeedSubscription {
    rx: broadcast::Receiver<ChangeEvent>,
}

impl FeedSubscription {
    /// Next event, or `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Feed subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn delivers_events_to_subscribers() {
        let hub = FeedHub::new(8);
        let mut sub = hub.subscribe();

        let event = ChangeEvent::insert(Uuid::new_v4(), Uuid::new_v4());
        hub.publish(event);

        assert_eq!(sub.next().await, Some(event));
    }

    #[tokio::test]
    async fn dropping_subscription_releases_interest() {
        let hub = FeedHub::new(8);
        let sub = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let hub = FeedHub::new(8);
        hub.publish(ChangeEvent::delete(Uuid::new_v4(), Uuid::new_v4()));
    }
}
