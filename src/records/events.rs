use super::models::{LogRecord, PlayEvent};
use super::reader::{read_json_lines, NormalizeError};
use super::time_bucket::{format_start_time, instant_from_millis, time_bucket};
use crate::warehouse::{StagedBatch, TimeBucket, User};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Page value of activity log records that represent a song being played.
pub const DEFAULT_PLAY_PAGE: &str = "NextSong";

/// Rows derived from the activity log feed.
///
/// `plays` keeps every qualifying record in discovery order; `time_buckets`
/// and `users` are deduplicated by key, first occurrence winning.
#[derive(Debug, Default)]
pub struct EventProjections {
    pub plays: Vec<PlayEvent>,
    pub time_buckets: Vec<TimeBucket>,
    pub users: Vec<User>,
    pub records_read: usize,
}

impl EventProjections {
    pub fn time_batch(&self) -> StagedBatch {
        StagedBatch::from_rows(&self.time_buckets)
    }

    pub fn users_batch(&self) -> StagedBatch {
        StagedBatch::from_rows(&self.users)
    }
}

fn to_play_event(
    path: &Path,
    line: usize,
    record: LogRecord,
) -> Result<(PlayEvent, DateTime<Utc>), NormalizeError> {
    let invalid = |field, reason: String| NormalizeError::InvalidField {
        path: path.to_path_buf(),
        line,
        field,
        reason,
    };

    let user_id = match &record.user_id {
        Some(raw) => raw
            .as_integer()
            .ok_or_else(|| invalid("userId", format!("{:?} is not an integer", raw)))?,
        None => return Err(invalid("userId", "missing".to_string())),
    };
    let instant = instant_from_millis(record.ts)
        .ok_or_else(|| invalid("ts", format!("{} is out of range", record.ts)))?;

    let play = PlayEvent {
        start_time: format_start_time(&instant),
        user_id,
        level: record.level,
        session_id: record.session_id,
        location: record.location,
        user_agent: record.user_agent,
        song: record.song,
        artist: record.artist,
        length: record.length,
    };
    Ok((play, instant))
}

/// Reads every log file, in order, keeps only records whose page equals
/// `play_page` and projects plays, time buckets and users from them.
pub fn normalize_events(
    files: &[PathBuf],
    play_page: &str,
) -> Result<EventProjections, NormalizeError> {
    let mut projections = EventProjections::default();
    let mut seen_start_times = HashSet::new();
    let mut seen_users = HashSet::new();

    for path in files {
        for (line, record) in read_json_lines::<LogRecord>(path)? {
            projections.records_read += 1;
            if record.page != play_page {
                continue;
            }

            let first_name = record.first_name.clone();
            let last_name = record.last_name.clone();
            let gender = record.gender.clone();
            let (play, instant) = to_play_event(path, line, record)?;

            if seen_start_times.insert(play.start_time.clone()) {
                projections.time_buckets.push(time_bucket(&instant));
            }

            if seen_users.insert(play.user_id) {
                projections.users.push(User {
                    user_id: play.user_id,
                    first_name,
                    last_name,
                    gender,
                    level: play.level.clone(),
                });
            }

            projections.plays.push(play);
        }
    }

    info!(
        "Event feed: {} records, {} song plays, {} distinct users, {} distinct start times",
        projections.records_read,
        projections.plays.len(),
        projections.users.len(),
        projections.time_buckets.len()
    );
    Ok(projections)
}
