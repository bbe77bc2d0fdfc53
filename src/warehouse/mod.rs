pub mod models;
pub mod schema;
mod staging;
mod store;

pub use models::{Artist, Song, SongPlay, SongRef, TimeBucket, User};
pub use staging::{ConflictPolicy, StagedBatch, Stageable};
pub use store::{SongKey, SqliteWarehouse, Warehouse};
