use anyhow::{Context, Result};
use clap::Parser;
use songplay_etl::{run_pipeline, AppConfig, CliConfig, FileConfig, SqliteWarehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(about = "Load song catalog and activity log JSON feeds into a SQLite warehouse")]
struct CliArgs {
    /// Path to the SQLite warehouse database file. Created if missing.
    #[clap(value_parser = parse_path, env = "SONGPLAY_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Path to the SQLite warehouse database file, as a flag. Takes
    /// precedence over the positional argument.
    #[clap(long = "db-path", value_name = "DB_PATH", value_parser = parse_path)]
    pub db_path_flag: Option<PathBuf>,

    /// Root directory of the song catalog feed.
    #[clap(long, default_value = "data/song_data")]
    pub song_data_dir: PathBuf,

    /// Root directory of the activity log feed.
    #[clap(long, default_value = "data/log_data")]
    pub log_data_dir: PathBuf,

    /// Extension of the feed files to pick up.
    #[clap(long, default_value = "json")]
    pub file_extension: String,

    /// Page value that marks an activity log record as a song play.
    #[clap(long, default_value = "NextSong")]
    pub play_page: String,

    /// Drop and re-create every warehouse table before loading.
    #[clap(long, default_value_t = false)]
    pub reset_schema: bool,

    /// Path to a TOML config file. Values in it override the CLI.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path_flag.clone().or_else(|| self.db_path.clone()),
            song_data_dir: self.song_data_dir.clone(),
            log_data_dir: self.log_data_dir.clone(),
            file_extension: self.file_extension.clone(),
            play_page: self.play_page.clone(),
            reset_schema: self.reset_schema,
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening warehouse database at {:?}...", config.db_path);
    let mut warehouse = SqliteWarehouse::open(&config.db_path)?;
    if config.reset_schema {
        warn!("Resetting warehouse schema, existing rows are dropped");
        warehouse.reset_schema()?;
    }

    let result = run_pipeline(&mut warehouse, &config.pipeline);
    // Released even when a feed failed to parse
    let closed = warehouse.close();
    let report = result?;
    closed?;

    for line in report.summary().lines() {
        info!("{}", line);
    }
    Ok(())
}
