#![allow(dead_code)]

pub const SONG_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_TITLE: &str = "I Didn't Mean To";
pub const SONG_YEAR: i32 = 0;
pub const SONG_DURATION: f64 = 218.93179;

pub const ARTIST_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_NAME: &str = "Casual";
pub const ARTIST_LOCATION: &str = "California - LA";

/// 2018-11-04 00:15:55.796 UTC, a Sunday in ISO week 44.
pub const TS_1: i64 = 1541290555796;
pub const TS_1_START_TIME: &str = "2018-11-04 00:15:55.796";
pub const TS_2: i64 = 1541290851796;
pub const TS_3: i64 = 1541291092796;

pub const USER_1: i64 = 26;
pub const USER_2: i64 = 91;
