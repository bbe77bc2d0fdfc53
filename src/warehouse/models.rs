//! Rows of the warehouse tables.
//!
//! Every type here is a plain value that maps one-to-one onto a table row
//! and knows how to stage itself for the bulk loader.

use super::schema::{
    ARTISTS_TABLE_NAME, SONGPLAYS_TABLE_NAME, SONGS_TABLE_NAME, TIME_TABLE_NAME, USERS_TABLE_NAME,
};
use super::staging::{ConflictPolicy, Stageable};
use rusqlite::types::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Calendar decomposition of one play instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeBucket {
    pub start_time: String,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
}

/// Identifiers of a catalog song and its artist.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SongRef {
    pub song_id: String,
    pub artist_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongPlay {
    pub start_time: String,
    pub user_id: i64,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl Stageable for Song {
    const TABLE: &'static str = SONGS_TABLE_NAME;
    const COLUMNS: &'static [&'static str] = &["song_id", "title", "artist_id", "year", "duration"];
    const CONFLICT: ConflictPolicy = ConflictPolicy::Ignore;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.song_id.clone()),
            Value::from(self.title.clone()),
            Value::from(self.artist_id.clone()),
            Value::from(self.year),
            Value::from(self.duration),
        ]
    }
}

impl Stageable for Artist {
    const TABLE: &'static str = ARTISTS_TABLE_NAME;
    const COLUMNS: &'static [&'static str] =
        &["artist_id", "name", "location", "latitude", "longitude"];
    const CONFLICT: ConflictPolicy = ConflictPolicy::Ignore;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.artist_id.clone()),
            Value::from(self.name.clone()),
            Value::from(self.location.clone()),
            Value::from(self.latitude),
            Value::from(self.longitude),
        ]
    }
}

impl Stageable for User {
    const TABLE: &'static str = USERS_TABLE_NAME;
    const COLUMNS: &'static [&'static str] =
        &["user_id", "first_name", "last_name", "gender", "level"];
    const CONFLICT: ConflictPolicy = ConflictPolicy::Ignore;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.user_id),
            Value::from(self.first_name.clone()),
            Value::from(self.last_name.clone()),
            Value::from(self.gender.clone()),
            Value::from(self.level.clone()),
        ]
    }
}

impl Stageable for TimeBucket {
    const TABLE: &'static str = TIME_TABLE_NAME;
    const COLUMNS: &'static [&'static str] =
        &["start_time", "hour", "day", "week", "month", "year", "weekday"];
    const CONFLICT: ConflictPolicy = ConflictPolicy::Ignore;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.start_time.clone()),
            Value::from(self.hour),
            Value::from(self.day),
            Value::from(self.week),
            Value::from(self.month),
            Value::from(self.year),
            Value::from(self.weekday),
        ]
    }
}

impl Stageable for SongPlay {
    const TABLE: &'static str = SONGPLAYS_TABLE_NAME;
    // songplay_id is assigned by the store
    const COLUMNS: &'static [&'static str] = &[
        "start_time",
        "user_id",
        "level",
        "song_id",
        "artist_id",
        "session_id",
        "location",
        "user_agent",
    ];
    const CONFLICT: ConflictPolicy = ConflictPolicy::Append;

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.start_time.clone()),
            Value::from(self.user_id),
            Value::from(self.level.clone()),
            Value::from(self.song_id.clone()),
            Value::from(self.artist_id.clone()),
            Value::from(self.session_id),
            Value::from(self.location.clone()),
            Value::from(self.user_agent.clone()),
        ]
    }
}
