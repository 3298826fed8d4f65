//! Driving-time lookup in fixed-size batches.
//!
//! Candidates are split into groups the distance-matrix provider accepts
//! (25 destinations) and each group is measured with one request. Batches
//! run one after another with a pause between them.

use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{CandidateRecord, Coordinate, RankedResult};

use super::context::RunContext;
use super::provider::{DistanceMatrix, MatrixElement, ProviderError};
use super::search::PipelineError;

/// A whole batch produced no usable durations.
#[derive(Debug, thiserror::Error)]
enum BatchFailed {
    #[error("distance matrix call failed: {0}")]
    Call(#[from] ProviderError),

    #[error("expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Measure driving times from `origin` to every candidate.
///
/// Candidates whose element is not OK are dropped silently. A failed batch
/// is logged and its candidates dropped; later batches still run.
/// Results are appended to `ctx.measured` as each batch completes, in
/// candidate order and not yet range-filtered, so an interrupted run keeps
/// what it measured.
pub(crate) async fn measure_driving_times<D: DistanceMatrix>(
    matrix: &D,
    origin: Coordinate,
    candidates: Vec<CandidateRecord>,
    batch_size: usize,
    pacing: Duration,
    ctx: &mut RunContext,
) -> Result<(), PipelineError> {
    let batch_size = batch_size.max(1);
    let total = candidates.len();
    ctx.measured.reserve(total);
    let mut remaining = candidates.into_iter().peekable();
    let mut start = 0;

    while remaining.peek().is_some() {
        if start > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
            ctx.ensure_current()?;
        }

        let batch: Vec<CandidateRecord> = remaining.by_ref().take(batch_size).collect();
        let end = start + batch.len();
        debug!(from = start + 1, to = end, total, "measuring driving times");

        let destinations: Vec<Coordinate> = batch.iter().map(|c| c.location).collect();
        ctx.stats.batches += 1;
        let outcome = matrix.driving_times(origin, &destinations).await;
        ctx.ensure_current()?;

        match check_shape(outcome, batch.len()) {
            Ok(elements) => {
                for (record, element) in batch.into_iter().zip(elements) {
                    match element {
                        Ok(travel) => ctx.measured.push(RankedResult::new(record, travel)),
                        Err(status) => {
                            debug!(name = %record.name, %status, "no driving time");
                            ctx.stats.unreachable += 1;
                        }
                    }
                }
            }
            Err(e) => {
                ctx.stats.failed_batches += 1;
                warn!(from = start + 1, to = end, error = %e, "driving time batch failed");
            }
        }

        start = end;
    }

    Ok(())
}

fn check_shape(
    outcome: Result<Vec<MatrixElement>, ProviderError>,
    expected: usize,
) -> Result<Vec<MatrixElement>, BatchFailed> {
    let elements = outcome?;
    if elements.len() != expected {
        return Err(BatchFailed::ShapeMismatch {
            expected,
            actual: elements.len(),
        });
    }
    Ok(elements)
}
