use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::realtime::event::{ChangeAction, ChangeEvent};

/// The in-memory reaction state: prayer id -> set of supporting users.
///
/// Every mutation is an idempotent set-membership operation keyed by
/// (prayer_id, user_id). That is the whole consistency story: the bulk load
/// and the change feed can race in either order, events can be applied twice
/// (the local write plus its NOTIFY echo), and the board still converges on
/// the true row set.
#[derive(Debug, Clone, Default)]
pub struct ReactionBoard {
    by_prayer: HashMap<Uuid, HashSet<Uuid>>,
}

impl ReactionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a bulk snapshot into the board. Rows already present (because a
    /// feed event arrived before the load finished) are absorbed silently.
    pub fn absorb(&mut self, rows: impl IntoIterator<Item = (Uuid, Uuid)>) {
        for (prayer_id, user_id) in rows {
            self.insert(prayer_id, user_id);
        }
    }

    /// Apply one change event. Idempotent in both directions.
    pub fn apply(&mut self, event: &ChangeEvent) {
        match event.action {
            ChangeAction::Insert => {
                self.insert(event.prayer_id, event.user_id);
            }
            ChangeAction::Delete => {
                self.remove(event.prayer_id, event.user_id);
            }
        }
    }

    /// Returns true if the user was newly added.
    pub fn insert(&mut self, prayer_id: Uuid, user_id: Uuid) -> bool {
        self.by_prayer.entry(prayer_id).or_default().insert(user_id)
    }

    /// Returns true if the user was present. Empty sets are pruned so the
    /// counts map never reports prayers nobody supports.
    pub fn remove(&mut self, prayer_id: Uuid, user_id: Uuid) -> bool {
        if let Some(users) = self.by_prayer.get_mut(&prayer_id) {
            let removed = users.remove(&user_id);
            if users.is_empty() {
                self.by_prayer.remove(&prayer_id);
            }
            removed
        } else {
            false
        }
    }

    pub fn count_for(&self, prayer_id: Uuid) -> usize {
        self.by_prayer.get(&prayer_id).map_or(0, HashSet::len)
    }

    pub fn has_reacted(&self, prayer_id: Uuid, user_id: Uuid) -> bool {
        self.by_prayer
            .get(&prayer_id)
            .map_or(false, |users| users.contains(&user_id))
    }

    /// Snapshot of all non-zero counts.
    pub fn counts(&self) -> HashMap<Uuid, usize> {
        self.by_prayer
            .iter()
            .map(|(prayer_id, users)| (*prayer_id, users.len()))
            .collect()
    }

    /// Prayers the given user currently supports.
    pub fn reacted_by(&self, user_id: Uuid) -> Vec<Uuid> {
        self.by_prayer
            .iter()
            .filter(|(_, users)| users.contains(&user_id))
            .map(|(prayer_id, _)| *prayer_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn count_equals_set_cardinality() {
        let (prayer, u1, u2) = ids();
        let mut board = ReactionBoard::new();
        board.insert(prayer, u1);
        board.insert(prayer, u2);
        assert_eq!(board.count_for(prayer), 2);

        board.remove(prayer, u1);
        assert_eq!(board.count_for(prayer), 1);
        assert!(!board.has_reacted(prayer, u1));
        assert!(board.has_reacted(prayer, u2));
    }

    #[test]
    fn repeated_insert_never_double_counts() {
        let (prayer, user, _) = ids();
        let mut board = ReactionBoard::new();
        assert!(board.insert(prayer, user));
        assert!(!board.insert(prayer, user));
        assert_eq!(board.count_for(prayer), 1);
    }

    #[test]
    fn applying_same_event_twice_is_idempotent() {
        let (prayer, user, _) = ids();
        let mut board = ReactionBoard::new();

        let event = ChangeEvent::insert(prayer, user);
        board.apply(&event);
        board.apply(&event);
        assert_eq!(board.count_for(prayer), 1);

        let event = ChangeEvent::delete(prayer, user);
        board.apply(&event);
        board.apply(&event);
        assert_eq!(board.count_for(prayer), 0);
    }

    #[test]
    fn delete_of_absent_pair_is_noop() {
        let (prayer, user, _) = ids();
        let mut board = ReactionBoard::new();
        board.apply(&ChangeEvent::delete(prayer, user));
        assert_eq!(board.count_for(prayer), 0);
        assert!(board.counts().is_empty());
    }

    #[test]
    fn load_and_feed_converge_in_either_order() {
        let (prayer, u1, u2) = ids();
        let snapshot = vec![(prayer, u1), (prayer, u2)];

        // Feed event first, bulk load second
        let mut early = ReactionBoard::new();
        early.apply(&ChangeEvent::insert(prayer, u1));
        early.absorb(snapshot.clone());

        // Bulk load first, feed event second
        let mut late = ReactionBoard::new();
        late.absorb(snapshot);
        late.apply(&ChangeEvent::insert(prayer, u1));

        assert_eq!(early.count_for(prayer), 2);
        assert_eq!(late.count_for(prayer), 2);
    }

    #[test]
    fn empty_sets_are_pruned_from_counts() {
        let (prayer, user, _) = ids();
        let mut board = ReactionBoard::new();
        board.insert(prayer, user);
        board.remove(prayer, user);
        assert!(board.counts().is_empty());
    }

    #[test]
    fn reacted_by_lists_only_that_users_prayers() {
        let (p1, u1, u2) = ids();
        let p2 = Uuid::new_v4();
        let mut board = ReactionBoard::new();
        board.insert(p1, u1);
        board.insert(p2, u1);
        board.insert(p2, u2);

        let mut mine = board.reacted_by(u1);
        mine.sort();
        let mut expected = vec![p1, p2];
        expected.sort();
        assert_eq!(mine, expected);
        assert_eq!(board.reacted_by(u2), vec![p2]);
    }
}
