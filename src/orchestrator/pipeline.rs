//! Sequencing of one load run.
//!
//! Catalog first (songs, artists), then the activity log (time buckets,
//! users), then one row per play. Every step commits on its own. A step that
//! the store rejects is rolled back, logged and recorded in the run report,
//! and the run carries on with the next step.

use super::report::{RunReport, SongPlayCounts, StepKind, StepOutcome, StepReport};
use crate::locator::find_files;
use crate::records::{normalize_catalog, normalize_events, PlayEvent, DEFAULT_PLAY_PAGE};
use crate::resolver::ReferenceResolver;
use crate::warehouse::{SongPlay, StagedBatch, Stageable, Warehouse};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub file_extension: String,
    /// Page value that marks an activity log record as a song play.
    pub play_page: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            song_data_dir: PathBuf::from("data/song_data"),
            log_data_dir: PathBuf::from("data/log_data"),
            file_extension: "json".to_string(),
            play_page: DEFAULT_PLAY_PAGE.to_string(),
        }
    }
}

fn rollback_after_failure<W: Warehouse + ?Sized>(warehouse: &mut W, step: StepKind) {
    if let Err(e) = warehouse.rollback() {
        error!("Error: rolling back after failed {} step: {:#}", step, e);
    }
}

fn load_and_commit<W: Warehouse + ?Sized>(warehouse: &mut W, batch: &StagedBatch) -> Result<usize> {
    let written = warehouse.bulk_load(batch)?;
    warehouse.commit()?;
    Ok(written)
}

/// Bulk-loads one staged batch and commits it.
fn load_step<W: Warehouse + ?Sized>(
    warehouse: &mut W,
    step: StepKind,
    batch: &StagedBatch,
) -> StepReport {
    let description = format!("bulk-loading {} rows into {}", batch.len(), batch.table());
    info!("{}...", description);

    let (rows_written, outcome) = match load_and_commit(warehouse, batch) {
        Ok(written) => {
            info!(
                "Loaded {}: {} written, {} skipped as duplicates",
                step,
                written,
                batch.len().saturating_sub(written)
            );
            (written, StepOutcome::Succeeded)
        }
        Err(e) => {
            error!("Error: {}: {:#}", description, e);
            rollback_after_failure(warehouse, step);
            (
                0,
                StepOutcome::Failed {
                    reason: format!("{:#}", e),
                },
            )
        }
    };

    StepReport {
        step,
        description,
        rows_staged: batch.len(),
        rows_written,
        outcome,
        song_plays: None,
    }
}

/// Resolves and inserts every play, one row at a time, with a single commit
/// at the end. A rejected row is logged and counted, the others still go in.
fn load_song_plays<W: Warehouse + ?Sized>(warehouse: &mut W, plays: &[PlayEvent]) -> StepReport {
    let step = StepKind::SongPlays;
    let description = format!("inserting {} song plays", plays.len());
    info!("{}...", description);

    let insert_sql =
        StagedBatch::new(SongPlay::TABLE, SongPlay::COLUMNS, SongPlay::CONFLICT).insert_sql();
    let mut resolver = ReferenceResolver::new();
    let mut counts = SongPlayCounts::default();
    let mut rows_written = 0;

    for play in plays {
        let row = resolver.resolve_play(warehouse, play);
        match warehouse.execute(&insert_sql, &row.to_values()) {
            Ok(written) => rows_written += written,
            Err(e) => {
                error!(
                    "Error: inserting song play at {} for user {}: {:#}",
                    row.start_time, row.user_id, e
                );
                counts.failed_rows += 1;
            }
        }
    }

    let stats = resolver.stats();
    counts.resolved = stats.resolved;
    counts.unresolved = stats.unresolved;
    counts.lookup_failures = stats.failures;
    info!(
        "Song plays resolved: {} matched, {} unmatched ({} lookups, {} cache hits, {} lookup errors)",
        stats.resolved, stats.unresolved, stats.lookups, stats.cache_hits, stats.failures
    );
    if counts.failed_rows > 0 {
        warn!("{} song plays were rejected by the store", counts.failed_rows);
    }

    let outcome = match warehouse.commit() {
        Ok(()) => StepOutcome::Succeeded,
        Err(e) => {
            error!("Error: committing song plays: {:#}", e);
            rollback_after_failure(warehouse, step);
            rows_written = 0;
            StepOutcome::Failed {
                reason: format!("{:#}", e),
            }
        }
    };

    StepReport {
        step,
        description,
        rows_staged: plays.len(),
        rows_written,
        outcome,
        song_plays: Some(counts),
    }
}

/// Runs the whole load once against `warehouse`.
///
/// Returns an error only when a feed cannot be parsed. Steps committed
/// before that point stay committed.
pub fn run_pipeline<W: Warehouse + ?Sized>(
    warehouse: &mut W,
    config: &PipelineConfig,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    info!("Processing song data in {}", config.song_data_dir.display());
    let song_files = find_files(&config.song_data_dir, &config.file_extension);
    if song_files.is_empty() {
        warn!("No song data files found, songs and artists stay as they are");
    }
    let catalog = normalize_catalog(&song_files).context("Failed to read song data")?;
    report.push(load_step(warehouse, StepKind::Songs, &catalog.songs_batch()));
    report.push(load_step(warehouse, StepKind::Artists, &catalog.artists_batch()));

    info!("Processing log data in {}", config.log_data_dir.display());
    let log_files = find_files(&config.log_data_dir, &config.file_extension);
    if log_files.is_empty() {
        warn!("No log data files found, no plays will be loaded");
    }
    let events =
        normalize_events(&log_files, &config.play_page).context("Failed to read log data")?;
    report.push(load_step(warehouse, StepKind::TimeBuckets, &events.time_batch()));
    report.push(load_step(warehouse, StepKind::Users, &events.users_batch()));
    report.push(load_song_plays(warehouse, &events.plays));

    let failed = report.failed_steps().count();
    if failed > 0 {
        warn!("Load finished with {} failed steps", failed);
    } else {
        info!("Load finished");
    }
    Ok(report)
}
