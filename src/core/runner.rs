use crate::core::Pipeline;
use crate::domain::model::FormattedPairing;
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub pairings: Vec<FormattedPairing>,
    pub history_entries_added: usize,
}

/// Drives one period: extract, transform, load. Nothing is written unless
/// the assignment succeeds.
pub struct ExchangeRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExchangeRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting Secret Santa run");
        let started = Instant::now();

        // Extract
        let phase = Instant::now();
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} participants and {} history rows in {:?}",
            input.participants.len(),
            input.history_log.len(),
            phase.elapsed()
        );

        // Transform
        let phase = Instant::now();
        let result = self.pipeline.transform(input).await?;
        tracing::info!(
            "Assigned {} pairings in {:?}",
            result.assignment.len(),
            phase.elapsed()
        );

        let pairings = result.report.clone();
        let history_entries_added = result.history_entries_added;

        // Load
        let phase = Instant::now();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Saved assignments to {} in {:?}", output_path, phase.elapsed());

        tracing::debug!("Run finished in {:?}", started.elapsed());
        Ok(RunSummary {
            output_path,
            pairings,
            history_entries_added,
        })
    }
}
