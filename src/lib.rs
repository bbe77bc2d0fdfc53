//! Songplay ETL Library
//!
//! Loads the song catalog feed and the activity log feed into a SQLite
//! star-schema warehouse. The binary is a thin wrapper around
//! [`orchestrator::run_pipeline`].

pub mod config;
pub mod locator;
pub mod orchestrator;
pub mod records;
pub mod resolver;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use orchestrator::{run_pipeline, PipelineConfig, RunReport, StepKind, StepOutcome};
pub use resolver::ReferenceResolver;
pub use warehouse::{SqliteWarehouse, Warehouse};
