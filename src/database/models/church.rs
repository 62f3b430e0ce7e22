use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A church is the top-level tenancy boundary. Every other row in the system
/// hangs off a church id; churches are addressed externally by slug.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Church {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named functional module within a church ("worship", "discipleship",
/// "nextstep"). Slugs are unique per church, not globally.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChurchService {
    pub id: Uuid,
    pub church_id: Uuid,
    pub slug: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Normalize a church slug the way every lookup expects it: trimmed and
/// lowercased. Service slugs are matched exactly and are not normalized.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_church_slugs() {
        assert_eq!(normalize_slug("  Riverside "), "riverside");
        assert_eq!(normalize_slug("KBBT"), "kbbt");
        assert_eq!(normalize_slug("kbbt"), "kbbt");
    }
}
