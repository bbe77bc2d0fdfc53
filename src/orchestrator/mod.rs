mod pipeline;
mod report;

pub use pipeline::{run_pipeline, PipelineConfig};
pub use report::{RunReport, SongPlayCounts, StepKind, StepOutcome, StepReport};
