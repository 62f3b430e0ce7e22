use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's "I'm praying" marker on one prayer. Unique on
/// (prayer_id, user_id) - a row either exists or it does not, so the row set
/// for a prayer is exactly its supporting-user set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reaction {
    pub id: Uuid,
    pub prayer_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
