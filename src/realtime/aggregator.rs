use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::realtime::board::ReactionBoard;
use crate::realtime::event::ChangeEvent;
use crate::services::reaction_service::{ReactionError, ReactionStore, SqlReactionStore};

/// Live reaction counts for every prayer board, kept in step with the store.
///
/// The board is seeded once by a bulk load and then maintained from two
/// inputs: confirmed local toggles and remote change events. The local set is
/// only touched after a store write succeeds, so a failed toggle leaves the
/// counts exactly as they were.
pub struct ReactionAggregator {
    board: ReactionBoard,
    store: Arc<dyn ReactionStore>,
}

impl ReactionAggregator {
    pub fn new(store: Arc<dyn ReactionStore>) -> Self {
        Self {
            board: ReactionBoard::new(),
            store,
        }
    }

    /// Process-wide aggregator backed by the SQL store. The caller is
    /// expected to run [`Self::load_all`] once and pump feed events into
    /// [`Self::apply_remote`] for the life of the process.
    pub fn shared() -> &'static Mutex<ReactionAggregator> {
        static INSTANCE: OnceLock<Mutex<ReactionAggregator>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| Mutex::new(ReactionAggregator::new(Arc::new(SqlReactionStore::new()))))
    }

    /// Bulk-fetch every reaction row and union it into the board. Safe to
    /// call at any point relative to feed traffic: both inputs are idempotent
    /// set operations, so the merge converges regardless of ordering.
    pub async fn load_all(&mut self) -> Result<(), ReactionError> {
        let rows = self.store.load_all().await?;
        let count = rows.len();
        self.board.absorb(rows);
        info!("Reaction board loaded: {} rows", count);
        Ok(())
    }

    /// Flip the caller's support for a prayer. Returns whether the user is
    /// supporting it after the call.
    ///
    /// Anonymous callers are rejected before any store traffic. The store
    /// write happens first and the local set is updated only on success.
    pub async fn toggle(
        &mut self,
        prayer_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<bool, ReactionError> {
        let user_id = user_id.ok_or(ReactionError::Unauthenticated)?;

        if self.board.has_reacted(prayer_id, user_id) {
            self.store.delete(prayer_id, user_id).await?;
            self.board.remove(prayer_id, user_id);
            Ok(false)
        } else {
            self.store.insert(prayer_id, user_id).await?;
            self.board.insert(prayer_id, user_id);
            Ok(true)
        }
    }

    /// Apply a pushed change event. Idempotent, so the echo of our own write
    /// coming back through the feed is harmless.
    pub fn apply_remote(&mut self, event: &ChangeEvent) {
        self.board.apply(event);
    }

    pub fn count_for(&self, prayer_id: Uuid) -> usize {
        self.board.count_for(prayer_id)
    }

    pub fn has_reacted(&self, prayer_id: Uuid, user_id: Uuid) -> bool {
        self.board.has_reacted(prayer_id, user_id)
    }

    pub fn counts(&self) -> HashMap<Uuid, usize> {
        self.board.counts()
    }

    pub fn reacted_by(&self, user_id: Uuid) -> Vec<Uuid> {
        self.board.reacted_by(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// In-memory store double with a failure switch and a call counter.
    #[derive(Default)]
    struct MemoryStore {
        rows: StdMutex<HashSet<(Uuid, Uuid)>>,
        fail_writes: AtomicBool,
        calls: AtomicUsize,
    }

    impl MemoryStore {
        fn rows(&self) -> HashSet<(Uuid, Uuid)> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReactionStore for MemoryStore {
        async fn load_all(&self) -> Result<Vec<(Uuid, Uuid)>, ReactionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().iter().copied().collect())
        }

        async fn insert(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ReactionError::Unavailable("store offline".to_string()));
            }
            self.rows.lock().unwrap().insert((prayer_id, user_id));
            Ok(())
        }

        async fn delete(&self, prayer_id: Uuid, user_id: Uuid) -> Result<(), ReactionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ReactionError::Unavailable("store offline".to_string()));
            }
            self.rows.lock().unwrap().remove(&(prayer_id, user_id));
            Ok(())
        }
    }

    fn aggregator() -> (ReactionAggregator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (ReactionAggregator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn toggle_is_its_own_inverse() {
        let (mut agg, store) = aggregator();
        let prayer = Uuid::new_v4();
        let user = Uuid::new_v4();

        for round in 1..=5 {
            let reacting = agg.toggle(prayer, Some(user)).await.unwrap();
            let expect_on = round % 2 == 1;
            assert_eq!(reacting, expect_on);
            assert_eq!(agg.has_reacted(prayer, user), expect_on);
            assert_eq!(store.rows().contains(&(prayer, user)), expect_on);
        }
    }

    #[tokio::test]
    async fn anonymous_toggle_is_rejected_without_store_traffic() {
        let (mut agg, store) = aggregator();
        let result = agg.toggle(Uuid::new_v4(), None).await;
        assert!(matches!(result, Err(ReactionError::Unauthenticated)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_write_leaves_local_state_untouched() {
        let (mut agg, store) = aggregator();
        let prayer = Uuid::new_v4();
        let user = Uuid::new_v4();

        agg.toggle(prayer, Some(user)).await.unwrap();
        assert_eq!(agg.count_for(prayer), 1);

        store.fail_writes.store(true, Ordering::SeqCst);
        let result = agg.toggle(prayer, Some(user)).await;
        assert!(result.is_err());
        assert_eq!(agg.count_for(prayer), 1);
        assert!(agg.has_reacted(prayer, user));
    }

    #[tokio::test]
    async fn load_converges_with_events_that_raced_ahead() {
        let (mut agg, store) = aggregator();
        let prayer = Uuid::new_v4();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

        store.rows.lock().unwrap().insert((prayer, u1));
        store.rows.lock().unwrap().insert((prayer, u2));

        // Event for u1 arrives before the bulk load completes
        agg.apply_remote(&ChangeEvent::insert(prayer, u1));
        agg.load_all().await.unwrap();

        assert_eq!(agg.count_for(prayer), 2);
    }

    #[tokio::test]
    async fn remote_echo_of_own_write_is_harmless() {
        let (mut agg, _store) = aggregator();
        let prayer = Uuid::new_v4();
        let user = Uuid::new_v4();

        agg.toggle(prayer, Some(user)).await.unwrap();
        // The NOTIFY round trip re-delivers the same insert
        agg.apply_remote(&ChangeEvent::insert(prayer, user));
        assert_eq!(agg.count_for(prayer), 1);
    }

    #[tokio::test]
    async fn removing_one_supporter_keeps_the_rest() {
        let (mut agg, _store) = aggregator();
        let p42 = Uuid::new_v4();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

        agg.apply_remote(&ChangeEvent::insert(p42, u1));
        agg.apply_remote(&ChangeEvent::insert(p42, u2));
        assert_eq!(agg.count_for(p42), 2);

        let reacting = agg.toggle(p42, Some(u1)).await.unwrap();
        assert!(!reacting);
        assert_eq!(agg.count_for(p42), 1);
        assert!(!agg.has_reacted(p42, u1));
        assert!(agg.has_reacted(p42, u2));
    }
}
