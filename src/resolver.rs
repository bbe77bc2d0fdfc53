//! Matching of play events to catalog songs.
//!
//! A play references a song by (title, artist name, duration). The match is
//! exact, including the duration. Results are memoized for the lifetime of
//! the resolver since the catalog does not change while plays are loaded.

use crate::records::PlayEvent;
use crate::warehouse::{SongKey, SongPlay, SongRef, Warehouse};
use std::collections::HashMap;
use tracing::{debug, error};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    title: String,
    artist_name: String,
    duration_bits: u64,
}

impl From<&SongKey> for CacheKey {
    fn from(key: &SongKey) -> Self {
        CacheKey {
            title: key.title.clone(),
            artist_name: key.artist_name.clone(),
            duration_bits: key.duration.to_bits(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub resolved: usize,
    pub unresolved: usize,
    /// Round-trips to the store.
    pub lookups: usize,
    pub cache_hits: usize,
    /// Lookups that failed with a store error.
    pub failures: usize,
}

/// Lookup key of a play, if it carries all three parts.
pub fn song_key(play: &PlayEvent) -> Option<SongKey> {
    match (&play.song, &play.artist, play.length) {
        (Some(title), Some(artist_name), Some(duration)) => Some(SongKey {
            title: title.clone(),
            artist_name: artist_name.clone(),
            duration,
        }),
        _ => None,
    }
}

#[derive(Default)]
pub struct ReferenceResolver {
    cache: HashMap<CacheKey, Option<SongRef>>,
    stats: ResolverStats,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Song and artist ids for `play`, or `None` when the catalog has no
    /// exact match. A failing lookup is logged and treated as no match.
    pub fn resolve<W: Warehouse + ?Sized>(
        &mut self,
        warehouse: &mut W,
        play: &PlayEvent,
    ) -> Option<SongRef> {
        let resolved = match song_key(play) {
            Some(key) => self.lookup(warehouse, &key),
            None => None,
        };
        if resolved.is_some() {
            self.stats.resolved += 1;
        } else {
            self.stats.unresolved += 1;
        }
        resolved
    }

    /// Builds the songplay row for `play`, with null song and artist ids
    /// when resolution fails. The row is produced either way.
    pub fn resolve_play<W: Warehouse + ?Sized>(
        &mut self,
        warehouse: &mut W,
        play: &PlayEvent,
    ) -> SongPlay {
        let (song_id, artist_id) = match self.resolve(warehouse, play) {
            Some(song_ref) => (Some(song_ref.song_id), Some(song_ref.artist_id)),
            None => (None, None),
        };
        SongPlay {
            start_time: play.start_time.clone(),
            user_id: play.user_id,
            level: play.level.clone(),
            song_id,
            artist_id,
            session_id: play.session_id,
            location: play.location.clone(),
            user_agent: play.user_agent.clone(),
        }
    }

    fn lookup<W: Warehouse + ?Sized>(&mut self, warehouse: &mut W, key: &SongKey) -> Option<SongRef> {
        let cache_key = CacheKey::from(key);
        if let Some(cached) = self.cache.get(&cache_key) {
            self.stats.cache_hits += 1;
            return cached.clone();
        }

        self.stats.lookups += 1;
        match warehouse.find_song(key) {
            Ok(found) => {
                debug!("Lookup {:?} -> {:?}", key, found);
                self.cache.insert(cache_key, found.clone());
                found
            }
            Err(e) => {
                // Not cached, a later identical play retries the lookup.
                error!("Error: Looking up song {:?}: {:#}", key, e);
                self.stats.failures += 1;
                None
            }
        }
    }
}
