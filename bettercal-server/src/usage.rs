//! Append-only usage log backed by sqlite.
//!
//! One row per distinct token per day; tokens are stored only as
//! sha256 hashes. Concurrent writers rely on sqlite's own atomicity
//! for the insert-or-ignore, not on application-level locking.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS statistics_daily (
    date TEXT NOT NULL DEFAULT (DATE('now')),
    token_hash TEXT NOT NULL,
    UNIQUE (date, token_hash)
)";

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_statistics_daily_date ON statistics_daily (date)";

/// Any day before the service went into production.
const SERIES_EPOCH: &str = "2023-07-16";

/// Aggregate distinct-token counts.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub daily_users: i64,
    pub monthly_users: i64,
    pub total_users: i64,
}

/// One day of the usage time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    pub date: String,
    pub daily: i64,
    pub monthly: i64,
    pub total: i64,
}

#[derive(Clone)]
pub struct UsageStore {
    pool: SqlitePool,
    // Fully elapsed days never change, so their series rows are cached.
    // Today's bucket is always recomputed.
    series_cache: Arc<Mutex<Vec<DailyUsage>>>,
}

impl UsageStore {
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::init(pool).await
    }

    /// An in-memory store for tests.
    pub async fn in_memory() -> Result<Self> {
        // A single connection: every sqlite :memory: handle is its own db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_INDEX).execute(&pool).await?;
        Ok(Self {
            pool,
            series_cache: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Insert-or-ignore one `(today, sha256(token))` row.
    pub async fn record(&self, token: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO statistics_daily (date, token_hash) \
             VALUES (DATE('now'), ?)",
        )
        .bind(hash_token(token))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        let daily_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM statistics_daily WHERE date = DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        let monthly_users = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT token_hash) FROM statistics_daily \
             WHERE date >= DATE('now', '-30 days')",
        )
        .fetch_one(&self.pool)
        .await?;

        let total_users =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT token_hash) FROM statistics_daily")
                .fetch_one(&self.pool)
                .await?;

        Ok(Statistics {
            daily_users,
            monthly_users,
            total_users,
        })
    }

    /// The day-by-day series, merged from the cache and fresh rows.
    pub async fn series(&self) -> Result<Vec<DailyUsage>> {
        let since = {
            let cache = self.series_cache.lock().unwrap();
            cache
                .last()
                .map(|day| day.date.clone())
                .unwrap_or_else(|| SERIES_EPOCH.to_string())
        };

        let fresh = self.series_since(&since).await?;

        let mut cache = self.series_cache.lock().unwrap();
        let mut series = cache.clone();
        series.extend(fresh.iter().cloned());

        // Never cache the newest day: it is still changing.
        if fresh.len() > 1 {
            cache.extend_from_slice(&fresh[..fresh.len() - 1]);
        }

        Ok(series)
    }

    async fn series_since(&self, since: &str) -> Result<Vec<DailyUsage>> {
        let rows = sqlx::query(
            "SELECT s.date AS date, \
                    COUNT(*) AS daily, \
                    (SELECT COUNT(DISTINCT token_hash) FROM statistics_daily s2 \
                      WHERE s2.date <= s.date AND s2.date >= DATE(s.date, '-30 days')) AS monthly, \
                    (SELECT COUNT(DISTINCT token_hash) FROM statistics_daily s3 \
                      WHERE s3.date <= s.date) AS total \
             FROM statistics_daily s \
             WHERE s.date > ? \
             GROUP BY s.date \
             ORDER BY s.date",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyUsage {
                date: row.get("date"),
                daily: row.get("daily"),
                monthly: row.get("monthly"),
                total: row.get("total"),
            })
            .collect())
    }
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_and_opaque() {
        let hash = hash_token("abc");
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
        assert_eq!(hash.len(), 64);
        assert!(!hash.contains("abc"));
    }

    #[tokio::test]
    async fn same_token_counts_once_per_day() {
        let store = UsageStore::in_memory().await.unwrap();
        store.record("abc").await.unwrap();
        store.record("abc").await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.daily_users, 1);
        assert_eq!(stats.total_users, 1);
    }

    #[tokio::test]
    async fn distinct_tokens_are_counted() {
        let store = UsageStore::in_memory().await.unwrap();
        store.record("abc").await.unwrap();
        store.record("def").await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.daily_users, 2);
        assert_eq!(stats.monthly_users, 2);
        assert_eq!(stats.total_users, 2);
    }

    #[tokio::test]
    async fn series_recomputes_the_open_day() {
        let store = UsageStore::in_memory().await.unwrap();
        store.record("abc").await.unwrap();

        let series = store.series().await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].daily, 1);

        // A second token on the same (still open) day must show up even
        // though the series was already queried once.
        store.record("def").await.unwrap();
        let series = store.series().await.unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].daily, 2);
    }

    #[tokio::test]
    async fn empty_store_has_an_empty_series() {
        let store = UsageStore::in_memory().await.unwrap();
        assert!(store.series().await.unwrap().is_empty());
        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total_users, 0);
    }
}
