//! In-memory staging buffers handed to the bulk loader.
//!
//! A [`StagedBatch`] carries everything a bulk insert needs: target table,
//! column order, the rows themselves and what to do when a row collides with
//! an existing natural key. Nothing is written to a shared staging file.

use rusqlite::types::Value;

/// What a bulk insert does with rows whose key already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// `ON CONFLICT DO NOTHING`: duplicates are silently skipped.
    Ignore,
    /// Plain insert. Used for tables without a natural key.
    Append,
}

/// A value that maps onto one row of a warehouse table.
pub trait Stageable {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const CONFLICT: ConflictPolicy;

    /// Column values in [`Stageable::COLUMNS`] order.
    fn to_values(&self) -> Vec<Value>;
}

#[derive(Clone, Debug)]
pub struct StagedBatch {
    table: &'static str,
    columns: &'static [&'static str],
    conflict: ConflictPolicy,
    rows: Vec<Vec<Value>>,
}

impl StagedBatch {
    pub fn new(
        table: &'static str,
        columns: &'static [&'static str],
        conflict: ConflictPolicy,
    ) -> Self {
        StagedBatch {
            table,
            columns,
            conflict,
            rows: Vec::new(),
        }
    }

    pub fn from_rows<T: Stageable>(rows: &[T]) -> Self {
        let mut batch = Self::new(T::TABLE, T::COLUMNS, T::CONFLICT);
        batch.rows = rows.iter().map(Stageable::to_values).collect();
        batch
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The parameterized single-row INSERT used for every staged row.
    pub fn insert_sql(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders
        );
        if self.conflict == ConflictPolicy::Ignore {
            sql.push_str(" ON CONFLICT DO NOTHING");
        }
        sql
    }
}
