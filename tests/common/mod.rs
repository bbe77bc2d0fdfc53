//! Common test infrastructure
//!
//! Tests build their feeds on disk with [`TestFeeds`] and run the real
//! pipeline against a warehouse file inside the same temporary directory.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{log_record, song_record, TestFeeds, SONG_DURATION, SONG_TITLE, ARTIST_NAME};
//!
//! #[test]
//! fn test_something() {
//!     let feeds = TestFeeds::new();
//!     feeds.write_song_file("A/A/A/TRAAAAW128F429D538.json", &[song_record()]);
//!     feeds.write_log_file("2018/11/2018-11-04-events.json", &[]);
//!     let report = feeds.run().unwrap();
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_record, other_page_record, song_record, TestFeeds};
