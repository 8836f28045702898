//! Subscription repository — CRUD for the `subscriptions` table.
//!
//! The endpoint URL is the primary key: upserting an endpoint that already
//! exists overwrites its key material and owner tag in place, so the table
//! can never hold two rows for one push destination.

use rusqlite::{Connection, OptionalExtension, params};

use faro_core::{BroadcastFilter, Subscription};

use crate::errors::Result;

/// A stored subscription row.
#[derive(Clone, Debug)]
pub struct SubscriptionRow {
    /// Push service endpoint URL (primary key).
    pub endpoint: String,
    /// Client's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
    /// Optional application-level scope.
    pub owner_tag: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last upsert.
    pub updated_at: String,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            endpoint: row.endpoint,
            p256dh: row.p256dh,
            auth: row.auth,
            owner_tag: row.owner_tag,
        }
    }
}

/// Subscription repository — stateless, every method takes `&Connection`.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Insert a subscription, or update key material and owner tag when the
    /// endpoint already exists. Returns whether a new row was created.
    pub fn upsert(conn: &Connection, sub: &Subscription) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let existed: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE endpoint = ?1)",
            params![sub.endpoint],
            |row| row.get(0),
        )?;
        let _ = conn.execute(
            "INSERT INTO subscriptions (endpoint, p256dh, auth, owner_tag, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(endpoint) DO UPDATE SET
                 p256dh = excluded.p256dh,
                 auth = excluded.auth,
                 owner_tag = excluded.owner_tag,
                 updated_at = excluded.updated_at",
            params![sub.endpoint, sub.p256dh, sub.auth, sub.owner_tag, now],
        )?;
        Ok(!existed)
    }

    /// Delete a subscription by endpoint. Returns `true` if a row was deleted;
    /// deleting a missing endpoint is a successful no-op.
    pub fn remove(conn: &Connection, endpoint: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM subscriptions WHERE endpoint = ?1",
            params![endpoint],
        )?;
        Ok(changed > 0)
    }

    /// Get a subscription by endpoint.
    pub fn get_by_endpoint(conn: &Connection, endpoint: &str) -> Result<Option<SubscriptionRow>> {
        let row = conn
            .query_row(
                "SELECT endpoint, p256dh, auth, owner_tag, created_at, updated_at
                 FROM subscriptions WHERE endpoint = ?1",
                params![endpoint],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// List subscriptions matching `filter`, ordered by endpoint.
    ///
    /// A filter with an owner tag matches only rows carrying that exact tag;
    /// rows with a NULL tag are never matched by a tagged filter.
    pub fn list(conn: &Connection, filter: &BroadcastFilter) -> Result<Vec<SubscriptionRow>> {
        match &filter.owner_tag {
            Some(tag) => {
                let mut stmt = conn.prepare(
                    "SELECT endpoint, p256dh, auth, owner_tag, created_at, updated_at
                     FROM subscriptions WHERE owner_tag = ?1 ORDER BY endpoint",
                )?;
                let rows = stmt
                    .query_map(params![tag], Self::map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT endpoint, p256dh, auth, owner_tag, created_at, updated_at
                     FROM subscriptions ORDER BY endpoint",
                )?;
                let rows = stmt
                    .query_map([], Self::map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            }
        }
    }

    /// Count stored subscriptions.
    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM subscriptions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Map a rusqlite row to [`SubscriptionRow`].
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubscriptionRow> {
        Ok(SubscriptionRow {
            endpoint: row.get(0)?,
            p256dh: row.get(1)?,
            auth: row.get(2)?,
            owner_tag: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA journal_mode = WAL;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn sub(endpoint: &str, owner_tag: Option<&str>) -> Subscription {
        Subscription {
            endpoint: endpoint.to_string(),
            p256dh: "BNcRdreALRFXTkOO".to_string(),
            auth: "tBHItJI5svbpez7K".to_string(),
            owner_tag: owner_tag.map(String::from),
        }
    }

    #[test]
    fn upsert_new_subscription() {
        let conn = setup();
        let created =
            SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();
        assert!(created);
        assert_eq!(SubscriptionRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn upsert_same_endpoint_updates_in_place() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();

        let mut rotated = sub("https://p.example/1", Some("team_a"));
        rotated.p256dh = "ROTATED_KEY".to_string();
        let created = SubscriptionRepo::upsert(&conn, &rotated).unwrap();

        assert!(!created, "conflict on endpoint must update, not insert");
        assert_eq!(SubscriptionRepo::count(&conn).unwrap(), 1);

        let row = SubscriptionRepo::get_by_endpoint(&conn, "https://p.example/1")
            .unwrap()
            .unwrap();
        assert_eq!(row.p256dh, "ROTATED_KEY");
        assert_eq!(row.owner_tag.as_deref(), Some("team_a"));
    }

    #[test]
    fn upsert_preserves_created_at_on_update() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();
        let first = SubscriptionRepo::get_by_endpoint(&conn, "https://p.example/1")
            .unwrap()
            .unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();
        let second = SubscriptionRepo::get_by_endpoint(&conn, "https://p.example/1")
            .unwrap()
            .unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_ne!(first.updated_at, second.updated_at);
    }

    #[test]
    fn remove_existing_endpoint() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();
        let deleted = SubscriptionRepo::remove(&conn, "https://p.example/1").unwrap();
        assert!(deleted);
        assert_eq!(SubscriptionRepo::count(&conn).unwrap(), 0);
    }

    #[test]
    fn remove_nonexistent_endpoint_is_silent() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();
        let deleted = SubscriptionRepo::remove(&conn, "https://p.example/ghost").unwrap();
        assert!(!deleted);
        assert_eq!(SubscriptionRepo::count(&conn).unwrap(), 1);
    }

    #[test]
    fn list_unfiltered_returns_all_ordered_by_endpoint() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/b", Some("team_a"))).unwrap();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/a", None)).unwrap();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/c", Some("team_b"))).unwrap();

        let rows = SubscriptionRepo::list(&conn, &BroadcastFilter::all()).unwrap();
        let endpoints: Vec<_> = rows.iter().map(|r| r.endpoint.as_str()).collect();
        assert_eq!(
            endpoints,
            [
                "https://p.example/a",
                "https://p.example/b",
                "https://p.example/c"
            ]
        );
    }

    #[test]
    fn list_filtered_matches_tag_equality_only() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", Some("team_a"))).unwrap();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/2", Some("team_b"))).unwrap();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/3", None)).unwrap();

        let rows = SubscriptionRepo::list(&conn, &BroadcastFilter::owner("team_a")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].endpoint, "https://p.example/1");
    }

    #[test]
    fn list_filtered_excludes_untagged_rows() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", None)).unwrap();

        let rows = SubscriptionRepo::list(&conn, &BroadcastFilter::owner("team_a")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn list_filter_with_no_matches_is_empty_not_error() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", Some("team_a"))).unwrap();
        let rows = SubscriptionRepo::list(&conn, &BroadcastFilter::owner("nobody")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn row_converts_to_core_subscription() {
        let conn = setup();
        SubscriptionRepo::upsert(&conn, &sub("https://p.example/1", Some("team_a"))).unwrap();
        let row = SubscriptionRepo::get_by_endpoint(&conn, "https://p.example/1")
            .unwrap()
            .unwrap();
        let converted: Subscription = row.into();
        assert_eq!(converted, sub("https://p.example/1", Some("team_a")));
    }
}
