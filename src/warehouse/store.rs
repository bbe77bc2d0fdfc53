//! SQLite-backed warehouse store.
//!
//! Writes happen inside an implicit transaction that is opened by the first
//! write after a commit, so callers decide where commit boundaries fall.

use super::models::SongRef;
use super::schema::{is_warehouse_table, latest_schema};
use super::staging::StagedBatch;
use anyhow::{bail, Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use tracing::{error, info};

/// Lookup key of a catalog song as seen from a play event.
#[derive(Clone, Debug, PartialEq)]
pub struct SongKey {
    pub title: String,
    pub artist_name: String,
    pub duration: f64,
}

/// Schema store and bulk loader used by the load pipeline.
pub trait Warehouse {
    /// Runs one statement inside the current transaction and returns the
    /// number of affected rows.
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<usize>;

    /// Inserts a whole staged batch. Either every row is applied or none is.
    /// Returns the number of rows written, not counting skipped conflicts.
    fn bulk_load(&mut self, batch: &StagedBatch) -> Result<usize>;

    /// First song whose title, artist name and duration all match exactly.
    fn find_song(&mut self, key: &SongKey) -> Result<Option<SongRef>>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    fn count(&mut self, table: &str) -> Result<usize>;
}

pub struct SqliteWarehouse {
    conn: Connection,
}

const FIND_SONG_SQL: &str = "SELECT s.song_id, s.artist_id \
     FROM songs s \
     JOIN artists a ON s.artist_id = a.artist_id \
     WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3 \
     ORDER BY s.rowid \
     LIMIT 1";

fn create_or_validate_schema(conn: &Connection) -> Result<()> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    let schema = latest_schema();
    if table_count == 0 {
        info!("Creating warehouse schema at version {}", schema.version);
        schema.create(conn)?;
        return Ok(());
    }

    schema
        .validate(conn)
        .context("Existing database does not match the warehouse schema")
}

impl SqliteWarehouse {
    /// Opens (or creates) the warehouse database at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open warehouse database: {:?}", db_path))?;
        create_or_validate_schema(&conn)?;
        Ok(SqliteWarehouse { conn })
    }

    /// In-memory warehouse, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_or_validate_schema(&conn)?;
        Ok(SqliteWarehouse { conn })
    }

    /// Drops and re-creates every warehouse table. Pending work is discarded.
    pub fn reset_schema(&mut self) -> Result<()> {
        self.rollback()?;
        let schema = latest_schema();
        let tx = self.conn.transaction()?;
        schema.drop_all(&tx)?;
        schema.create(&tx)?;
        tx.commit()?;
        info!("Warehouse schema reset to version {}", schema.version);
        Ok(())
    }

    /// Releases the connection. Uncommitted work is rolled back.
    pub fn close(mut self) -> Result<()> {
        self.rollback()?;
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close warehouse database")
    }

    fn begin_if_needed(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }
}

impl Warehouse for SqliteWarehouse {
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<usize> {
        self.begin_if_needed()?;
        let affected = self.conn.execute(statement, params_from_iter(params.iter()))?;
        Ok(affected)
    }

    fn bulk_load(&mut self, batch: &StagedBatch) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        self.begin_if_needed()?;
        self.conn.execute_batch("SAVEPOINT bulk_load")?;

        let result = (|| -> Result<usize> {
            let mut stmt = self.conn.prepare_cached(&batch.insert_sql())?;
            let mut written = 0;
            for (row_index, row) in batch.rows().iter().enumerate() {
                written += stmt
                    .execute(params_from_iter(row.iter()))
                    .with_context(|| {
                        format!("Row {} rejected by table {}", row_index, batch.table())
                    })?;
            }
            Ok(written)
        })();

        match result {
            Ok(written) => {
                self.conn.execute_batch("RELEASE bulk_load")?;
                Ok(written)
            }
            Err(e) => {
                if let Err(rollback_err) = self
                    .conn
                    .execute_batch("ROLLBACK TO bulk_load; RELEASE bulk_load")
                {
                    error!(
                        "Error: rolling back rejected batch for {}: {}",
                        batch.table(),
                        rollback_err
                    );
                    return Err(e.context(format!(
                        "Savepoint rollback for {} also failed: {}",
                        batch.table(),
                        rollback_err
                    )));
                }
                Err(e)
            }
        }
    }

    fn find_song(&mut self, key: &SongKey) -> Result<Option<SongRef>> {
        let mut stmt = self.conn.prepare_cached(FIND_SONG_SQL)?;
        let song_ref = stmt
            .query_row(params![key.title, key.artist_name, key.duration], |r| {
                Ok(SongRef {
                    song_id: r.get(0)?,
                    artist_id: r.get(1)?,
                })
            })
            .optional()?;
        Ok(song_ref)
    }

    fn commit(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT")?;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn count(&mut self, table: &str) -> Result<usize> {
        if !is_warehouse_table(table) {
            bail!("Unknown warehouse table: {}", table);
        }
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
        Ok(count as usize)
    }
}
