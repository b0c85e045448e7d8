//! Append-only log of classified readings.
//!
//! Backed by SQLite through `sqlx`. Appends go through a write gate that
//! serializes id and timestamp assignment; reads use the pool concurrently and
//! only ever see committed rows.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::{NewReading, Reading, RiskDistribution, RiskLevel, WindowSample};

// ---

const LATEST_FOR_DEVICE: &str = r#"
    SELECT id, device_id, timestamp, temperature, smoke, gas, risk_level, risk_code
    FROM sensor_readings
    WHERE device_id = ?
    ORDER BY id DESC
    LIMIT ?
"#;

const LATEST_ALL: &str = r#"
    SELECT id, device_id, timestamp, temperature, smoke, gas, risk_level, risk_code
    FROM sensor_readings
    ORDER BY id DESC
    LIMIT ?
"#;

#[derive(Debug, Clone)]
pub struct ReadingStore {
    pool: SqlitePool,
    /// Serializes appends and remembers the last timestamp handed out.
    write_gate: Arc<Mutex<Option<DateTime<Utc>>>>,
}

/// Raw row as stored; converted into a [`Reading`] after consistency checks.
#[derive(Debug, sqlx::FromRow)]
struct ReadingRow {
    id: i64,
    device_id: String,
    timestamp: String,
    temperature: f64,
    smoke: i64,
    gas: i64,
    risk_level: String,
    risk_code: i64,
}

impl TryFrom<ReadingRow> for Reading {
    type Error = StoreError;

    fn try_from(row: ReadingRow) -> Result<Self, Self::Error> {
        // ---
        let level = RiskLevel::from_label(&row.risk_level)
            .ok_or_else(|| StoreError::Corrupt(format!("row {}: unknown risk level", row.id)))?;
        if RiskLevel::from_code(row.risk_code) != Some(level) {
            return Err(StoreError::Corrupt(format!(
                "row {}: risk code {} does not match {}",
                row.id, row.risk_code, level
            )));
        }
        let timestamp = decode_timestamp(&row.timestamp)
            .map_err(|e| StoreError::Corrupt(format!("row {}: {e}", row.id)))?;

        Ok(Reading {
            id: row.id,
            device_id: row.device_id,
            timestamp,
            temperature: row.temperature,
            smoke: row.smoke,
            gas: row.gas,
            risk_level: level,
            risk_code: level.code(),
        })
    }
}

/// Fixed-width UTC text, so string order is chronological order.
fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}

impl ReadingStore {
    // ---
    /// Open (creating if needed) the database at `db_url`.
    ///
    /// WAL keeps readers off the writer; `synchronous = FULL` makes a commit
    /// durable before `append` returns.
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        // ---
        let options = SqliteConnectOptions::from_str(db_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_gate: Arc::new(Mutex::new(None)),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Append a classified reading and return it as stored.
    ///
    /// The server assigns both the id and the timestamp. Timestamps never go
    /// backwards in id order, even if the wall clock does.
    pub async fn append(
        &self,
        reading: NewReading,
        risk_level: RiskLevel,
    ) -> Result<Reading, StoreError> {
        // ---
        let mut last = self.write_gate.lock().await;

        let now = Utc::now().trunc_subsecs(6);
        let timestamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };

        let id = sqlx::query(
            r#"
            INSERT INTO sensor_readings (
                device_id, timestamp, temperature, smoke, gas, risk_level, risk_code
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reading.device_id)
        .bind(encode_timestamp(timestamp))
        .bind(reading.features.temperature)
        .bind(reading.features.smoke)
        .bind(reading.features.gas)
        .bind(risk_level.as_str())
        .bind(i64::from(risk_level.code()))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        *last = Some(timestamp);
        Ok(Reading::new(id, timestamp, reading, risk_level))
    }

    /// At most `limit` readings, newest (highest id) first.
    pub async fn latest(
        &self,
        device_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Reading>, StoreError> {
        // ---
        let rows: Vec<ReadingRow> = match device_id {
            Some(device) => {
                sqlx::query_as(LATEST_FOR_DEVICE)
                    .bind(device)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as(LATEST_ALL)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.into_iter().map(Reading::try_from).collect()
    }

    pub async fn distinct_devices(&self) -> Result<Vec<String>, StoreError> {
        // ---
        let devices =
            sqlx::query_scalar("SELECT DISTINCT device_id FROM sensor_readings ORDER BY device_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(devices)
    }

    /// Feature triples of every reading stamped at or after `cutoff`.
    pub async fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<WindowSample>, StoreError> {
        // ---
        let samples = sqlx::query_as(
            "SELECT temperature, smoke, gas FROM sensor_readings WHERE timestamp >= ?",
        )
        .bind(encode_timestamp(cutoff))
        .fetch_all(&self.pool)
        .await?;
        Ok(samples)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        // ---
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM sensor_readings")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn risk_counts(&self) -> Result<RiskDistribution, StoreError> {
        // ---
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT risk_level, COUNT(*) FROM sensor_readings GROUP BY risk_level",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut dist = RiskDistribution::default();
        for (label, count) in rows {
            let level = RiskLevel::from_label(&label)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown risk level {label:?}")))?;
            dist.add(level, count);
        }
        Ok(dist)
    }
}
