//! SQLite schema of the play-analytics warehouse.
//!
//! Four dimension tables keyed by their natural key (songs, artists, users,
//! time) and one fact table (songplays) with a surrogate rowid key. Play
//! events reference songs and artists by value only; no foreign keys are
//! enforced so that unresolved plays can still be stored.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

pub const SONGPLAYS_TABLE_NAME: &str = "songplays";
pub const USERS_TABLE_NAME: &str = "users";
pub const SONGS_TABLE_NAME: &str = "songs";
pub const ARTISTS_TABLE_NAME: &str = "artists";
pub const TIME_TABLE_NAME: &str = "time";

const SONGS_TABLE: Table = Table {
    name: SONGS_TABLE_NAME,
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real),
    ],
    // Serves the title/artist/duration lookup of play events.
    indices: &[("idx_songs_title", "title")],
};

const ARTISTS_TABLE: Table = Table {
    name: ARTISTS_TABLE_NAME,
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

const USERS_TABLE: Table = Table {
    name: USERS_TABLE_NAME,
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text),
    ],
    indices: &[],
};

const TIME_TABLE: Table = Table {
    name: TIME_TABLE_NAME,
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true), // 'YYYY-MM-DD HH:MM:SS.mmm' UTC
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true), // 0=Monday
    ],
    indices: &[],
};

const SONGPLAYS_TABLE: Table = Table {
    name: SONGPLAYS_TABLE_NAME,
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[("idx_songplays_start_time", "start_time")],
};

/// Versioned schemas of the warehouse database, oldest first.
pub const WAREHOUSE_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        SONGS_TABLE,
        ARTISTS_TABLE,
        USERS_TABLE,
        TIME_TABLE,
        SONGPLAYS_TABLE,
    ],
}];

/// The schema new databases are created with.
pub fn latest_schema() -> &'static VersionedSchema {
    &WAREHOUSE_VERSIONED_SCHEMAS[WAREHOUSE_VERSIONED_SCHEMAS.len() - 1]
}

pub fn is_warehouse_table(name: &str) -> bool {
    latest_schema().tables.iter().any(|t| t.name == name)
}
