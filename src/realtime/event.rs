use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happened to a reaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Insert,
    Delete,
}

/// A change notification for the prayer_reactions relation. This is the wire
/// payload for both the Postgres NOTIFY channel and the SSE feed, so the
/// serialized form is part of the external contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub action: ChangeAction,
    pub prayer_id: Uuid,
    pub user_id: Uuid,
}

impl ChangeEvent {
    pub fn insert(prayer_id: Uuid, user_id: Uuid) -> Self {
        Self {
            action: ChangeAction::Insert,
            prayer_id,
            user_id,
        }
    }

    pub fn delete(prayer_id: Uuid, user_id: Uuid) -> Self {
        Self {
            action: ChangeAction::Delete,
            prayer_id,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_stable() {
        let prayer = Uuid::nil();
        let user = Uuid::nil();
        let json = serde_json::to_value(ChangeEvent::insert(prayer, user)).unwrap();
        assert_eq!(json["action"], "insert");

        let back: ChangeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ChangeEvent::insert(prayer, user));
    }
}
