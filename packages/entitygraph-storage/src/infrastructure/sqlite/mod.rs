//! SQLite adapter for AdjacencyStore
//!
//! One database file holds every collection. The writer connection runs in WAL
//! mode so read-only connections keep serving lookups while a bulk build commits;
//! reads go through the memory-mapped I/O path (`mmap_size`).
//!
//! Each `put_batch` is one transaction, which makes it the checkpoint unit of a
//! long build: a crash loses at most the batch in flight.

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{
    decode_list, encode_list, validate_ids, AdjacencyStore, DistributionCache, Relation,
    WEIGHT_COLLECTION,
};
use crate::{Result, StorageError};

/// Tunables for the SQLite adapter
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// Bytes of the database file mapped into memory for reads
    pub mmap_size_bytes: u64,

    /// Read-only connections serving `get` (0 = share the writer connection)
    pub read_connections: usize,

    /// How long a connection waits on a locked database
    pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            mmap_size_bytes: 256 * 1024 * 1024,
            read_connections: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// SQLite-based AdjacencyStore implementation
pub struct SqliteAdjacencyStore {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    next_reader: AtomicUsize,
    path: Option<PathBuf>,
}

impl SqliteAdjacencyStore {
    /// Open (or create) the store file at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(db_path, SqliteOptions::default())
    }

    /// Open with explicit options
    pub fn open_with(db_path: impl AsRef<Path>, options: SqliteOptions) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let writer = Connection::open(&path)?;
        writer.busy_timeout(options.busy_timeout)?;
        let journal: String =
            writer.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        writer.pragma_update(None, "synchronous", "NORMAL")?;
        apply_mmap(&writer, options.mmap_size_bytes)?;
        init_schema(&writer)?;

        // Readers open after the schema exists
        let readers = (0..options.read_connections)
            .map(|_| {
                let conn = Connection::open_with_flags(
                    &path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )?;
                conn.busy_timeout(options.busy_timeout)?;
                apply_mmap(&conn, options.mmap_size_bytes)?;
                Ok(Mutex::new(conn))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            path = %path.display(),
            journal = %journal,
            readers = readers.len(),
            "Opened adjacency store"
        );

        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            next_reader: AtomicUsize::new(0),
            path: Some(path),
        })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            writer: Mutex::new(conn),
            readers: Vec::new(),
            next_reader: AtomicUsize::new(0),
            path: None,
        })
    }

    /// Backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Checkpoint the WAL and close every connection.
    pub fn close(self) -> Result<()> {
        self.checkpoint()?;
        drop(self.readers);
        self.writer
            .into_inner()
            .close()
            .map_err(|(_, err)| StorageError::from(err))?;
        if let Some(path) = &self.path {
            info!(path = %path.display(), "Closed adjacency store");
        }
        Ok(())
    }

    fn reader(&self) -> MutexGuard<'_, Connection> {
        if self.readers.is_empty() {
            return self.writer.lock();
        }
        let slot = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        self.readers[slot].lock()
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Reserved collections
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Store a precomputed distribution (serialized as JSON)
    pub fn put_distribution(
        &self,
        cache: DistributionCache,
        key: &str,
        distribution: &[(String, f64)],
    ) -> Result<()> {
        let value = serde_json::to_string(distribution)?;
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            cache.collection()
        );
        let conn = self.writer.lock();
        conn.prepare_cached(&sql)?.execute(params![key, value])?;
        Ok(())
    }

    /// Load a precomputed distribution
    pub fn get_distribution(
        &self,
        cache: DistributionCache,
        key: &str,
    ) -> Result<Option<Vec<(String, f64)>>> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", cache.collection());
        let conn = self.reader();
        let mut stmt = conn.prepare_cached(&sql)?;
        let value: Option<String> = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        value
            .map(|json| serde_json::from_str(&json).map_err(StorageError::from))
            .transpose()
    }

    /// Store a cached feature weight
    pub fn put_weight(&self, key: &str, weight: f64) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            WEIGHT_COLLECTION
        );
        let conn = self.writer.lock();
        conn.prepare_cached(&sql)?.execute(params![key, weight])?;
        Ok(())
    }

    /// Load a cached feature weight
    pub fn get_weight(&self, key: &str) -> Result<Option<f64>> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", WEIGHT_COLLECTION);
        let conn = self.reader();
        let mut stmt = conn.prepare_cached(&sql)?;
        let weight = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(weight)
    }
}

impl AdjacencyStore for SqliteAdjacencyStore {
    fn get(&self, relation: Relation, key: &str) -> Result<Option<Vec<String>>> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", relation.collection());
        let conn = self.reader();
        let mut stmt = conn.prepare_cached(&sql)?;
        let value: Option<String> = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(value.map(|v| decode_list(&v)))
    }

    fn put(&self, relation: Relation, key: &str, ids: &[String]) -> Result<()> {
        validate_ids(key, ids)?;
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            relation.collection()
        );
        let conn = self.writer.lock();
        conn.prepare_cached(&sql)?
            .execute(params![key, encode_list(ids)])?;
        Ok(())
    }

    fn put_batch(&self, relation: Relation, entries: &[(String, Vec<String>)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        for (key, ids) in entries {
            validate_ids(key, ids)?;
        }

        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)",
            relation.collection()
        );
        let mut conn = self.writer.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(&sql)?;
            for (key, ids) in entries {
                stmt.execute(params![key, encode_list(ids)])?;
            }
        }
        tx.commit()
            .map_err(|e| StorageError::transaction(format!("Batch commit failed: {}", e)))?;

        debug!(relation = %relation, keys = entries.len(), "Committed adjacency batch");
        Ok(())
    }

    fn checkpoint(&self) -> Result<()> {
        let conn = self.writer.lock();
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }

    fn key_count(&self, relation: Relation) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", relation.collection());
        let conn = self.reader();
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn apply_mmap(conn: &Connection, bytes: u64) -> Result<()> {
    let _granted: i64 =
        conn.pragma_update_and_check(None, "mmap_size", bytes as i64, |row| row.get(0))?;
    Ok(())
}

/// Initialize database schema
fn init_schema(conn: &Connection) -> Result<()> {
    for relation in Relation::all() {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                ) WITHOUT ROWID",
                relation.collection()
            ),
            [],
        )?;
    }

    for cache in [
        DistributionCache::EntityToEntity,
        DistributionCache::ParagraphToEntity,
    ] {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                ) WITHOUT ROWID",
                cache.collection()
            ),
            [],
        )?;
    }

    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {} (
                key TEXT PRIMARY KEY,
                value REAL NOT NULL
            ) WITHOUT ROWID",
            WEIGHT_COLLECTION
        ),
        [],
    )?;

    Ok(())
}
