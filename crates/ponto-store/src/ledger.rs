use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use ponto_core::PunchRecord;
use rusqlite::params;
use tokio_rusqlite::Connection;

use crate::Result;

/// Append-only record of attendance events.
///
/// Every time field of a record derives from the single instant the caller
/// evaluated, never from a clock read of our own — the date and time of one
/// punch can never disagree across a tick boundary.
#[derive(Clone)]
pub struct PunchLedger {
    conn: Connection,
}

impl PunchLedger {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Append one punch for `username` at `instant` (already in the
    /// configured timezone). Returns the stored record.
    pub async fn append(
        &self,
        username: &str,
        instant: DateTime<Tz>,
        location: &str,
    ) -> Result<PunchRecord> {
        let username = username.to_string();
        let location = location.to_string();
        let punch_date = instant.format("%Y-%m-%d").to_string();
        let punch_time = instant.format("%H:%M:%S").to_string();
        let minute = instant.minute();
        let second = instant.second();
        let created_at = instant.to_rfc3339();

        let record = self
            .conn
            .call(move |conn| {
                let id = conn.query_row(
                    "INSERT INTO punch_records
                        (username, punch_date, punch_time, minute, second, location, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     RETURNING id",
                    params![username, punch_date, punch_time, minute, second, location, created_at],
                    |row| row.get::<_, i64>(0),
                )?;
                Ok(PunchRecord {
                    id,
                    username,
                    punch_date,
                    punch_time,
                    minute,
                    second,
                    location,
                    created_at,
                })
            })
            .await?;

        Ok(record)
    }

    /// Newest punches first, at most `limit` of them.
    pub async fn recent(&self, limit: u32) -> Result<Vec<PunchRecord>> {
        let records = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, username, punch_date, punch_time, minute, second, location, created_at
                     FROM punch_records
                     ORDER BY id DESC
                     LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], |row| {
                    Ok(PunchRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        punch_date: row.get(2)?,
                        punch_time: row.get(3)?,
                        minute: row.get(4)?,
                        second: row.get(5)?,
                        location: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?;

                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await?;

        Ok(records)
    }
}
