use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Songs,
    Artists,
    TimeBuckets,
    Users,
    SongPlays,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Songs => "songs",
            StepKind::Artists => "artists",
            StepKind::TimeBuckets => "time buckets",
            StepKind::Users => "users",
            StepKind::SongPlays => "song plays",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed { reason: String },
}

/// Extra counters of the per-row songplay step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongPlayCounts {
    /// Rows whose insert was rejected by the store.
    pub failed_rows: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Plays left unresolved because the lookup itself failed.
    pub lookup_failures: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKind,
    /// The attempted action, as logged when the step fails.
    pub description: String,
    pub rows_staged: usize,
    pub rows_written: usize,
    pub outcome: StepOutcome,
    pub song_plays: Option<SongPlayCounts>,
}

impl StepReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == StepOutcome::Succeeded
    }
}

/// Outcome of every load step of one run, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn push(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn step(&self, kind: StepKind) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.step == kind)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.succeeded())
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(StepReport::succeeded)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec!["Load summary".to_string(), "============".to_string()];
        for step in &self.steps {
            let status = match &step.outcome {
                StepOutcome::Succeeded => "ok".to_string(),
                StepOutcome::Failed { reason } => format!("FAILED ({})", reason),
            };
            lines.push(format!(
                "{:<12} staged {:>6}, written {:>6}  {}",
                step.step.to_string(),
                step.rows_staged,
                step.rows_written,
                status
            ));
            if let Some(counts) = &step.song_plays {
                lines.push(format!(
                    "{:<12} resolved {}, unresolved {}, rejected {}, lookup errors {}",
                    "",
                    counts.resolved,
                    counts.unresolved,
                    counts.failed_rows,
                    counts.lookup_failures
                ));
            }
        }
        let failed = self.failed_steps().count();
        if failed > 0 {
            lines.push(format!("{} of {} steps failed", failed, self.steps.len()));
        }
        lines.join("\n")
    }
}
