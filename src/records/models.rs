//! Raw shapes of the two input feeds.

use serde::Deserialize;

/// One line of the song catalog feed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// User id as it appears in the activity log: usually a numeric string,
/// empty for logged-out activity.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawUserId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawUserId {
    /// Integer value of the id, if it has one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawUserId::Integer(id) => Some(*id),
            RawUserId::Float(id) if id.fract() == 0.0 => Some(*id as i64),
            RawUserId::Float(_) => None,
            RawUserId::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// One line of the user activity log feed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub ts: i64,
    #[serde(default)]
    pub user_id: Option<RawUserId>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub page: String,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    pub session_id: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// A log record that passed the song-play filter, with its user id cast and
/// its timestamp converted.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEvent {
    pub start_time: String,
    pub user_id: i64,
    pub level: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
}
