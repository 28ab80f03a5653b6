//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The history log calls store methods; it never executes SQL directly.

use crate::{error::SimResult, history::HistoryStore, score::ResultRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, Row};

pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        // Each append must be durable before it returns.
        conn.execute_batch("PRAGMA synchronous=FULL;")?;
        log::debug!("Opened history database at {path}");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to call repeatedly.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_simulation_history.sql"))?;
        Ok(())
    }

    // ── Results ────────────────────────────────────────────────

    pub fn insert_result(&self, feature_key: &str, record: &ResultRecord) -> SimResult<()> {
        let score = signed_param(record.score)?;
        let total_answered = signed_param(record.total_answered)?;
        self.conn.execute(
            "INSERT INTO simulation_result
                (feature_key, score, total_answered, percentage, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                feature_key,
                score,
                total_answered,
                i64::from(record.percentage),
                record.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ],
        )?;
        Ok(())
    }

    /// All results for `feature_key`, oldest first.
    pub fn results_for(&self, feature_key: &str) -> SimResult<Vec<ResultRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT score, total_answered, percentage, recorded_at
             FROM simulation_result WHERE feature_key = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![feature_key], |row| {
            Ok(ResultRecord {
                score:          unsigned_column(row, 0)?,
                total_answered: unsigned_column(row, 1)?,
                percentage:     unsigned_column(row, 2)?,
                timestamp:      timestamp_column(row, 3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of persisted results for `feature_key` (for tests).
    pub fn result_count(&self, feature_key: &str) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM simulation_result WHERE feature_key = ?1",
            params![feature_key],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn signed_param(value: u64) -> rusqlite::Result<i64> {
    i64::try_from(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Read an INTEGER column into an unsigned field, rejecting values that do not fit.
fn unsigned_column<T: TryFrom<i64>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T::Error: std::error::Error + Send + Sync + 'static,
{
    let raw: i64 = row.get(idx)?;
    T::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// Read an RFC 3339 TEXT column.
fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl HistoryStore for HistoryDb {
    fn load(&self, feature_key: &str) -> SimResult<Vec<ResultRecord>> {
        self.results_for(feature_key)
    }

    fn append(&self, feature_key: &str, record: &ResultRecord) -> SimResult<()> {
        self.insert_result(feature_key, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use chrono::TimeZone;

    fn migrated() -> HistoryDb {
        let db = HistoryDb::in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn timestamps_are_stored_as_rfc3339_text() {
        let db = migrated();
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 15, 43, 42).unwrap()
            + chrono::Duration::nanoseconds(656_899_778);
        let record = ResultRecord { score: 3, total_answered: 4, percentage: 75, timestamp: at };
        db.insert_result("phishing_simulation", &record).unwrap();

        let raw: String = db
            .conn
            .query_row("SELECT recorded_at FROM simulation_result", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2026-10-18T15:43:42.656899778Z");
        assert_eq!(db.results_for("phishing_simulation").unwrap(), vec![record]);
    }

    #[test]
    fn out_of_range_column_is_reported_not_truncated() {
        let db = migrated();
        db.conn
            .execute(
                "INSERT INTO simulation_result
                    (feature_key, score, total_answered, percentage, recorded_at)
                 VALUES ('k', 0, 8589934592, 0, '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let rows = db.results_for("k").unwrap();
        assert_eq!(rows[0].total_answered, 8_589_934_592);

        db.conn.execute_batch("PRAGMA ignore_check_constraints = ON;").unwrap();
        db.conn
            .execute(
                "INSERT INTO simulation_result
                    (feature_key, score, total_answered, percentage, recorded_at)
                 VALUES ('bad', 0, 1, 4294967396, '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let err = db.results_for("bad").unwrap_err();
        assert!(matches!(
            err,
            SimError::Database(rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, _))
        ));
    }

    #[test]
    fn malformed_timestamp_is_a_conversion_error() {
        let db = migrated();
        db.conn
            .execute(
                "INSERT INTO simulation_result
                    (feature_key, score, total_answered, percentage, recorded_at)
                 VALUES ('k', 1, 1, 100, 'yesterday')",
                [],
            )
            .unwrap();
        let err = db.results_for("k").unwrap_err();
        assert!(matches!(
            err,
            SimError::Database(rusqlite::Error::FromSqlConversionFailure(3, Type::Text, _))
        ));
    }
}
