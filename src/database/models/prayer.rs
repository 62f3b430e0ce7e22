use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a prayer board entry. Two states only, and the transition is
/// reversible: an admin can move a request to answered and back again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerStatus {
    Request,
    Answered,
}

impl PrayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerStatus::Request => "request",
            PrayerStatus::Answered => "answered",
        }
    }

    /// The other state. Status writes are unconditional, so this exists for
    /// callers that want the symmetric transition rather than a fixed target.
    pub fn flipped(&self) -> Self {
        match self {
            PrayerStatus::Request => PrayerStatus::Answered,
            PrayerStatus::Answered => PrayerStatus::Request,
        }
    }
}

impl fmt::Display for PrayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrayerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(PrayerStatus::Request),
            "answered" => Ok(PrayerStatus::Answered),
            other => Err(format!("unknown prayer status: {}", other)),
        }
    }
}

/// A prayer request or testimony on a (church, service) board. Submitters may
/// be anonymous; `author_name` is free text supplied with the submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prayer {
    pub id: Uuid,
    pub church_id: Uuid,
    pub service_id: Uuid,
    pub author_name: String,
    pub body: String,
    pub category: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        assert_eq!(PrayerStatus::from_str("request").unwrap(), PrayerStatus::Request);
        assert_eq!(PrayerStatus::from_str("answered").unwrap(), PrayerStatus::Answered);
        assert!(PrayerStatus::from_str("closed").is_err());
    }

    #[test]
    fn flip_is_its_own_inverse() {
        assert_eq!(PrayerStatus::Request.flipped(), PrayerStatus::Answered);
        assert_eq!(PrayerStatus::Request.flipped().flipped(), PrayerStatus::Request);
    }
}
