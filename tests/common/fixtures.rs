//! Feed file writers for end-to-end tests.

#![allow(dead_code)]

use super::constants::*;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::{json, Value};
use songplay_etl::{run_pipeline, PipelineConfig, RunReport, SqliteWarehouse};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A catalog record for the test song.
pub fn song_record() -> Value {
    json!({
        "num_songs": 1,
        "artist_id": ARTIST_ID,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": ARTIST_LOCATION,
        "artist_name": ARTIST_NAME,
        "song_id": SONG_ID,
        "title": SONG_TITLE,
        "duration": SONG_DURATION,
        "year": SONG_YEAR,
    })
}

/// A song-play log record. User ids are written as strings, like the real
/// activity logs do.
pub fn log_record(user_id: i64, level: &str, ts: i64, song: &str, artist: &str, length: f64) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": format!("First{}", user_id),
        "gender": "F",
        "itemInSession": 0,
        "lastName": "Tester",
        "length": length,
        "level": level,
        "location": "Lansing-East Lansing, MI",
        "method": "PUT",
        "page": "NextSong",
        "registration": 1540809153796.0,
        "sessionId": 900,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0",
        "userId": user_id.to_string(),
    })
}

/// A log record for a page other than a song play, with no song fields.
pub fn other_page_record(page: &str, ts: i64) -> Value {
    json!({
        "artist": null,
        "auth": "Logged Out",
        "firstName": null,
        "gender": null,
        "itemInSession": 0,
        "lastName": null,
        "length": null,
        "level": "free",
        "location": null,
        "method": "GET",
        "page": page,
        "registration": null,
        "sessionId": 901,
        "song": null,
        "status": 200,
        "ts": ts,
        "userAgent": null,
        "userId": "",
    })
}

/// Temporary song and log feed trees plus a warehouse file next to them.
pub struct TestFeeds {
    dir: TempDir,
}

impl TestFeeds {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("song_data")).expect("Failed to create song_data");
        fs::create_dir_all(dir.path().join("log_data")).expect("Failed to create log_data");
        TestFeeds { dir }
    }

    pub fn song_data_dir(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_data_dir(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("warehouse.db")
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            song_data_dir: self.song_data_dir(),
            log_data_dir: self.log_data_dir(),
            ..Default::default()
        }
    }

    pub fn write_song_file(&self, relative: &str, records: &[Value]) {
        write_lines(&self.song_data_dir().join(relative), records);
    }

    pub fn write_log_file(&self, relative: &str, records: &[Value]) {
        write_lines(&self.log_data_dir().join(relative), records);
    }

    pub fn write_raw_log_file(&self, relative: &str, content: &str) {
        let path = self.log_data_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create feed dir");
        }
        fs::write(path, content).expect("Failed to write feed file");
    }

    /// One full run against the on-disk warehouse, connection released after.
    pub fn run(&self) -> Result<RunReport> {
        let mut warehouse = SqliteWarehouse::open(self.db_path())?;
        let result = run_pipeline(&mut warehouse, &self.config());
        warehouse.close()?;
        result
    }

    /// Opens a plain connection on the warehouse file for assertions.
    pub fn connection(&self) -> Connection {
        Connection::open(self.db_path()).expect("Failed to open warehouse db")
    }

    pub fn count(&self, table: &str) -> i64 {
        self.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .expect("Failed to count rows")
    }
}

fn write_lines(path: &Path, records: &[Value]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create feed dir");
    }
    let content = records
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(path, content).expect("Failed to write feed file");
}
