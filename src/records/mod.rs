//! Normalization of the two line-delimited JSON feeds into warehouse rows.
//!
//! The catalog feed yields songs and artists. The activity log feed yields
//! song plays, time buckets and users. The two feeds never cross.

mod catalog;
mod events;
pub mod models;
mod reader;
mod time_bucket;

pub use catalog::{normalize_catalog, CatalogProjections};
pub use events::{normalize_events, EventProjections, DEFAULT_PLAY_PAGE};
pub use models::{LogRecord, PlayEvent, RawUserId, SongRecord};
pub use reader::{read_json_lines, NormalizeError};
pub use time_bucket::{format_start_time, instant_from_millis, time_bucket};
