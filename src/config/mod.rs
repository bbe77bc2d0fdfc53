mod file_config;

pub use file_config::FileConfig;

use crate::orchestrator::PipelineConfig;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// Every field here can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub file_extension: String,
    pub play_page: String,
    pub reset_schema: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        CliConfig {
            db_path: None,
            song_data_dir: pipeline.song_data_dir,
            log_data_dir: pipeline.log_data_dir,
            file_extension: pipeline.file_extension,
            play_page: pipeline.play_page,
            reset_schema: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub reset_schema: bool,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "db_path must be specified via the DB_PATH argument, --db-path, SONGPLAY_DB_PATH or in config file"
                )
            })?;
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let song_data_dir = file
            .song_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data_dir.clone());
        let log_data_dir = file
            .log_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data_dir.clone());

        // Accept ".json" as well as "json"
        let file_extension = file
            .file_extension
            .unwrap_or_else(|| cli.file_extension.clone())
            .trim_start_matches('.')
            .to_string();
        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }

        let play_page = file.play_page.unwrap_or_else(|| cli.play_page.clone());
        if play_page.trim().is_empty() {
            bail!("play_page must not be empty");
        }

        let reset_schema = file.reset_schema.unwrap_or(cli.reset_schema);

        Ok(Self {
            db_path,
            reset_schema,
            pipeline: PipelineConfig {
                song_data_dir,
                log_data_dir,
                file_extension,
                play_page,
            },
        })
    }
}
