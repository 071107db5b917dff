//! ponto-store — Durable storage for enrolled identities and punch records.
//!
//! Single SQLite database behind a [`tokio_rusqlite`] connection; the
//! [`IdentityStore`] and [`PunchLedger`] handles share it. All write
//! atomicity is delegated to single SQLite statements — the callers hold no
//! locks of their own.

mod codec;
mod identity;
mod ledger;

use std::path::Path;

use thiserror::Error;
use tokio_rusqlite::Connection;

pub use identity::IdentityStore;
pub use ledger::PunchLedger;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS identities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL UNIQUE,
    age INTEGER NOT NULL,
    descriptor BLOB NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS punch_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    punch_date TEXT NOT NULL,
    punch_time TEXT NOT NULL,
    minute INTEGER NOT NULL,
    second INTEGER NOT NULL,
    location TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_punch_records_username
    ON punch_records(username, id);
";

/// Open database handle. Clone-safe; clones share the one connection.
#[derive(Clone)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at the given path and apply the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    /// Open an in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    pub fn identities(&self) -> IdentityStore {
        IdentityStore::new(self.conn.clone())
    }

    pub fn ledger(&self) -> PunchLedger {
        PunchLedger::new(self.conn.clone())
    }

    /// Connectivity probe for the status surface.
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
