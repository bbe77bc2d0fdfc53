use super::models::SongRecord;
use super::reader::{read_json_lines, NormalizeError};
use crate::warehouse::{Artist, Song, StagedBatch};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::info;

/// Song and artist rows derived from the catalog feed, each deduplicated by
/// its key with the first occurrence winning.
#[derive(Debug, Default)]
pub struct CatalogProjections {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub records_read: usize,
}

impl CatalogProjections {
    pub fn songs_batch(&self) -> StagedBatch {
        StagedBatch::from_rows(&self.songs)
    }

    pub fn artists_batch(&self) -> StagedBatch {
        StagedBatch::from_rows(&self.artists)
    }
}

/// Reads every catalog file, in order, and projects songs and artists.
pub fn normalize_catalog(files: &[PathBuf]) -> Result<CatalogProjections, NormalizeError> {
    let mut projections = CatalogProjections::default();
    let mut seen_songs = HashSet::new();
    let mut seen_artists = HashSet::new();

    for path in files {
        for (_line, record) in read_json_lines::<SongRecord>(path)? {
            projections.records_read += 1;

            if seen_songs.insert(record.song_id.clone()) {
                projections.songs.push(Song {
                    song_id: record.song_id,
                    title: record.title,
                    artist_id: record.artist_id.clone(),
                    year: record.year,
                    duration: record.duration,
                });
            }

            if seen_artists.insert(record.artist_id.clone()) {
                projections.artists.push(Artist {
                    artist_id: record.artist_id,
                    name: record.artist_name,
                    location: record.artist_location,
                    latitude: record.artist_latitude,
                    longitude: record.artist_longitude,
                });
            }
        }
    }

    info!(
        "Catalog feed: {} records, {} distinct songs, {} distinct artists",
        projections.records_read,
        projections.songs.len(),
        projections.artists.len()
    );
    Ok(projections)
}
