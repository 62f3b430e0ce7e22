// Server-side filtering, sorting and pagination for prayer boards.
// The front-end used to do all of this in memory; here it becomes one
// parameterized SQL tail appended after the board-scoping conditions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

use crate::database::models::PrayerStatus;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid status filter: {0}")]
    InvalidStatus(String),
}

/// Typed bind value produced by the query builder. The service layer feeds
/// these to sqlx in order, so placeholder numbering and bind order must agree.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(String),
    Time(DateTime<Utc>),
}

/// SQL fragments for one board query. `conditions` is either empty or a
/// string of "AND ..." clauses continuing an existing WHERE.
#[derive(Debug)]
pub struct QuerySql {
    pub conditions: String,
    pub binds: Vec<Bind>,
    pub order_by: String,
    pub limit: String,
}

/// Query-string parameters accepted by the prayer board listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrayerQuery {
    /// Board selector; defaults to the configured service slug.
    pub service: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    /// Substring match against body and author name.
    pub q: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

const SORT_KEYS: &[&str] = &["created_at", "author_name", "category", "status"];

impl PrayerQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        let api = &crate::config::config().api;
        self.page_size
            .unwrap_or(api.default_page_size)
            .clamp(1, api.max_page_size)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }

    fn sort_key(&self) -> Result<&str, FilterError> {
        match self.sort.as_deref() {
            None => Ok("created_at"),
            Some(key) if SORT_KEYS.contains(&key) => Ok(key),
            Some(other) => Err(FilterError::InvalidSortKey(other.to_string())),
        }
    }

    fn direction(&self) -> Result<&'static str, FilterError> {
        match self.dir.as_deref() {
            None | Some("desc") => Ok("DESC"),
            Some("asc") => Ok("ASC"),
            Some(other) => Err(FilterError::InvalidDirection(other.to_string())),
        }
    }

    /// Build the filter/sort/pagination tail. `first_param` is the index of
    /// the next free `$n` placeholder after the caller's own binds.
    pub fn to_sql(&self, first_param: usize) -> Result<QuerySql, FilterError> {
        let mut conditions = String::new();
        let mut binds: Vec<Bind> = Vec::new();
        let mut param = first_param;

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            conditions.push_str(&format!(" AND category = ${}", param));
            binds.push(Bind::Text(category.to_string()));
            param += 1;
        }

        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            let status = PrayerStatus::from_str(status)
                .map_err(|_| FilterError::InvalidStatus(status.to_string()))?;
            conditions.push_str(&format!(" AND status = ${}", param));
            binds.push(Bind::Text(status.as_str().to_string()));
            param += 1;
        }

        if let Some(q) = self.q.as_deref().filter(|q| !q.trim().is_empty()) {
            let pattern = format!("%{}%", escape_like(q.trim()));
            conditions.push_str(&format!(
                " AND (body ILIKE ${} OR author_name ILIKE ${})",
                param,
                param + 1
            ));
            binds.push(Bind::Text(pattern.clone()));
            binds.push(Bind::Text(pattern));
            param += 2;
        }

        if let Some(from) = self.from {
            let start = from.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc();
            conditions.push_str(&format!(" AND created_at >= ${}", param));
            binds.push(Bind::Time(start));
            param += 1;
        }

        if let Some(to) = self.to {
            // End-exclusive: everything before midnight of the next day
            let end = to
                .succ_opt()
                .unwrap_or(to)
                .and_hms_opt(0, 0, 0)
                .expect("midnight exists")
                .and_utc();
            conditions.push_str(&format!(" AND created_at < ${}", param));
            binds.push(Bind::Time(end));
        }

        let order_by = format!("ORDER BY {} {}", self.sort_key()?, self.direction()?);
        let limit = format!("LIMIT {} OFFSET {}", self.page_size(), self.offset());

        Ok(QuerySql {
            conditions,
            binds,
            order_by,
            limit,
        })
    }
}

/// Escape LIKE wildcards in user-supplied search text so they match
/// literally. Postgres uses backslash as the default escape character.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_sorts_newest_first() {
        let query = PrayerQuery::default();
        let sql = query.to_sql(3).unwrap();
        assert_eq!(sql.conditions, "");
        assert!(sql.binds.is_empty());
        assert_eq!(sql.order_by, "ORDER BY created_at DESC");
        assert!(sql.limit.starts_with("LIMIT 25 OFFSET 0"));
    }

    #[test]
    fn placeholders_continue_from_first_param() {
        let query = PrayerQuery {
            category: Some("health".to_string()),
            status: Some("answered".to_string()),
            q: Some("storm".to_string()),
            ..Default::default()
        };
        let sql = query.to_sql(3).unwrap();
        assert_eq!(
            sql.conditions,
            " AND category = $3 AND status = $4 AND (body ILIKE $5 OR author_name ILIKE $6)"
        );
        assert_eq!(sql.binds.len(), 4);
        assert_eq!(sql.binds[2], Bind::Text("%storm%".to_string()));
    }

    #[test]
    fn rejects_unknown_sort_key() {
        let query = PrayerQuery {
            sort: Some("body; DROP TABLE prayers".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.to_sql(1), Err(FilterError::InvalidSortKey(_))));
    }

    #[test]
    fn rejects_unknown_status() {
        let query = PrayerQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.to_sql(1), Err(FilterError::InvalidStatus(_))));
    }

    #[test]
    fn caps_page_size_and_computes_offset() {
        let query = PrayerQuery {
            page: Some(3),
            page_size: Some(1_000_000),
            ..Default::default()
        };
        let max = crate::config::config().api.max_page_size;
        assert_eq!(query.page_size(), max);
        assert_eq!(query.offset(), 2 * max);
    }

    #[test]
    fn date_range_is_end_inclusive() {
        let query = PrayerQuery {
            from: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()),
            ..Default::default()
        };
        let sql = query.to_sql(1).unwrap();
        assert_eq!(sql.conditions, " AND created_at >= $1 AND created_at < $2");
        match (&sql.binds[0], &sql.binds[1]) {
            (Bind::Time(start), Bind::Time(end)) => {
                assert_eq!(start.date_naive().to_string(), "2024-03-01");
                assert_eq!(end.date_naive().to_string(), "2024-04-01");
            }
            other => panic!("unexpected binds: {:?}", other),
        }
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
