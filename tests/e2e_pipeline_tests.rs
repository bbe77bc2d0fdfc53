//! End-to-end tests for the load pipeline
//!
//! Every test writes real feed files, runs the pipeline against an on-disk
//! warehouse and inspects the resulting tables with plain SQL.

mod common;

use common::*;
use songplay_etl::{SqliteWarehouse, StepKind, Warehouse};

fn write_standard_feeds(feeds: &TestFeeds) {
    feeds.write_song_file("A/B/C/TRABCEI128F424C983.json", &[song_record()]);
    feeds.write_log_file(
        "2018/11/2018-11-04-events.json",
        &[
            other_page_record("Home", TS_1 - 1000),
            log_record(USER_1, "free", TS_1, SONG_TITLE, ARTIST_NAME, SONG_DURATION),
            log_record(USER_1, "paid", TS_2, SONG_TITLE, ARTIST_NAME, SONG_DURATION),
            other_page_record("Logout", TS_2 + 1),
            log_record(USER_2, "free", TS_3, SONG_TITLE, ARTIST_NAME, SONG_DURATION + 0.001),
        ],
    );
}

#[test]
fn test_end_to_end_single_song_three_plays() {
    let feeds = TestFeeds::new();
    write_standard_feeds(&feeds);

    let report = feeds.run().unwrap();
    assert!(report.all_succeeded(), "{}", report.summary());

    assert_eq!(feeds.count("songs"), 1);
    assert_eq!(feeds.count("artists"), 1);
    assert_eq!(feeds.count("users"), 2);
    assert_eq!(feeds.count("time"), 3);
    assert_eq!(feeds.count("songplays"), 3);

    let conn = feeds.connection();
    let resolved: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM songplays WHERE song_id = ?1 AND artist_id = ?2",
            [SONG_ID, ARTIST_ID],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(resolved, 2);

    let unresolved: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM songplays WHERE song_id IS NULL AND artist_id IS NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(unresolved, 1);

    let unresolved_user: i64 = conn
        .query_row(
            "SELECT user_id FROM songplays WHERE song_id IS NULL",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(unresolved_user, USER_2);

    let counts = report
        .step(StepKind::SongPlays)
        .unwrap()
        .song_plays
        .clone()
        .unwrap();
    assert_eq!(counts.resolved, 2);
    assert_eq!(counts.unresolved, 1);
    assert_eq!(counts.failed_rows, 0);
}

#[test]
fn test_non_play_pages_reach_no_table() {
    let feeds = TestFeeds::new();
    feeds.write_song_file("A/song.json", &[song_record()]);
    feeds.write_log_file(
        "2018/11/events.json",
        &[
            other_page_record("Home", TS_1),
            other_page_record("Settings", TS_2),
            other_page_record("Logout", TS_3),
        ],
    );

    feeds.run().unwrap();

    assert_eq!(feeds.count("time"), 0);
    assert_eq!(feeds.count("users"), 0);
    assert_eq!(feeds.count("songplays"), 0);
    // Catalog is loaded regardless
    assert_eq!(feeds.count("songs"), 1);
}

#[test]
fn test_duplicate_song_ids_across_files_load_once() {
    let feeds = TestFeeds::new();
    feeds.write_song_file("A/A/one.json", &[song_record()]);
    feeds.write_song_file("A/B/two.json", &[song_record(), song_record()]);
    feeds.write_song_file("B/three.json", &[song_record()]);
    feeds.write_log_file("events.json", &[]);

    let report = feeds.run().unwrap();

    assert_eq!(report.step(StepKind::Songs).unwrap().rows_staged, 1);
    assert_eq!(feeds.count("songs"), 1);
    assert_eq!(feeds.count("artists"), 1);
}

#[test]
fn test_time_bucket_of_known_timestamp() {
    let feeds = TestFeeds::new();
    feeds.write_log_file(
        "events.json",
        &[log_record(USER_1, "free", TS_1, SONG_TITLE, ARTIST_NAME, SONG_DURATION)],
    );

    feeds.run().unwrap();

    let row: (String, i64, i64, i64, i64, i64, i64) = feeds
        .connection()
        .query_row(
            "SELECT start_time, hour, day, week, month, year, weekday FROM time",
            [],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .unwrap();
    assert_eq!(row, (TS_1_START_TIME.to_string(), 0, 4, 44, 11, 2018, 6));

    let play_start_time: String = feeds
        .connection()
        .query_row("SELECT start_time FROM songplays", [], |r| r.get(0))
        .unwrap();
    assert_eq!(play_start_time, TS_1_START_TIME);
}

#[test]
fn test_rerun_keeps_dimensions_and_duplicates_plays() {
    let feeds = TestFeeds::new();
    write_standard_feeds(&feeds);

    feeds.run().unwrap();
    let second = feeds.run().unwrap();

    assert!(second.all_succeeded());
    assert_eq!(feeds.count("songs"), 1);
    assert_eq!(feeds.count("artists"), 1);
    assert_eq!(feeds.count("users"), 2);
    assert_eq!(feeds.count("time"), 3);
    // Song plays have no natural key
    assert_eq!(feeds.count("songplays"), 6);

    // Dimension rows were staged again but nothing was written
    for kind in [StepKind::Songs, StepKind::Artists, StepKind::TimeBuckets, StepKind::Users] {
        let step = second.step(kind).unwrap();
        assert!(step.rows_staged > 0);
        assert_eq!(step.rows_written, 0, "{} wrote rows on rerun", kind);
    }
}

#[test]
fn test_first_seen_user_level_is_kept() {
    let feeds = TestFeeds::new();
    write_standard_feeds(&feeds);

    feeds.run().unwrap();

    let level: String = feeds
        .connection()
        .query_row(
            "SELECT level FROM users WHERE user_id = ?1",
            [USER_1],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(level, "free");

    // Each play still carries its own level
    let paid_plays: i64 = feeds
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM songplays WHERE user_id = ?1 AND level = 'paid'",
            [USER_1],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(paid_plays, 1);
}

#[test]
fn test_malformed_log_file_aborts_run_after_catalog() {
    let feeds = TestFeeds::new();
    feeds.write_song_file("A/song.json", &[song_record()]);
    feeds.write_raw_log_file("events.json", "{\"ts\": 1541290555796, \"page\": ");

    let result = feeds.run();

    assert!(result.is_err());
    assert_eq!(feeds.count("songs"), 1);
    assert_eq!(feeds.count("artists"), 1);
    assert_eq!(feeds.count("songplays"), 0);
}

#[test]
fn test_reset_schema_empties_warehouse() {
    let feeds = TestFeeds::new();
    write_standard_feeds(&feeds);
    feeds.run().unwrap();
    assert_eq!(feeds.count("songplays"), 3);

    let mut warehouse = SqliteWarehouse::open(feeds.db_path()).unwrap();
    warehouse.reset_schema().unwrap();
    for table in ["songplays", "users", "songs", "artists", "time"] {
        assert_eq!(warehouse.count(table).unwrap(), 0);
    }
    warehouse.close().unwrap();

    feeds.run().unwrap();
    assert_eq!(feeds.count("songplays"), 3);
}
