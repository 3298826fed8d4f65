//! The search pipeline: find, deduplicate, classify, exclude, measure, rank.

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::RankedResult;

use super::batch::measure_driving_times;
use super::classify::{Classifier, classify_and_filter};
use super::config::PipelineConfig;
use super::context::{GenerationToken, RunContext, RunStats};
use super::finder::find_candidates;
use super::provider::{DistanceMatrix, PlaceSearch};
use super::query::{InvalidInput, SearchQuery};
use super::rank::rank_within_budget;

/// Errors that end a search without results.
///
/// Provider failures are not here: they degrade to partial results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The user's input could not be parsed
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// The run exceeded its wall-clock budget before measuring anything
    #[error("search timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// A newer search replaced this one
    #[error("search superseded by a newer request")]
    Superseded,

    /// The classifier could not be built
    #[error("invalid classifier configuration: {0}")]
    Config(String),
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Results within the budget, shortest drive first.
    pub results: Vec<RankedResult>,

    /// What happened along the way.
    pub stats: RunStats,
}

/// Nearby-place ranking pipeline over a place-search and a distance-matrix
/// provider.
pub struct Pipeline<P, D> {
    places: P,
    matrix: D,
    config: PipelineConfig,
    classifier: Classifier,
}

impl<P, D> Pipeline<P, D>
where
    P: PlaceSearch + Sync,
    D: DistanceMatrix + Sync,
{
    /// Create a pipeline with the standard classifier.
    pub fn new(places: P, matrix: D, config: PipelineConfig) -> Result<Self, PipelineError> {
        let classifier =
            Classifier::standard().map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(Self::with_classifier(places, matrix, config, classifier))
    }

    pub fn with_classifier(
        places: P,
        matrix: D,
        config: PipelineConfig,
        classifier: Classifier,
    ) -> Self {
        Self {
            places,
            matrix,
            config,
            classifier,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn places(&self) -> &P {
        &self.places
    }

    pub fn matrix(&self) -> &D {
        &self.matrix
    }

    /// Run the whole pipeline for `query`.
    ///
    /// The run belongs to the generation of `token` and is abandoned with
    /// [`PipelineError::Superseded`] once a newer generation starts. It is
    /// bounded by the configured timeout; a run that times out after
    /// measuring some places returns those, flagged in
    /// [`RunStats::timed_out`].
    pub async fn run(
        &self,
        query: &SearchQuery,
        token: GenerationToken,
    ) -> Result<SearchOutcome, PipelineError> {
        let mut ctx = RunContext::new(token);
        let generation = ctx.generation();
        let timeout = self.config.timeout;

        info!(
            generation,
            origin = %query.origin(),
            budget_mins = query.time_budget_mins(),
            category = %query.category(),
            "search started"
        );

        let finished = tokio::time::timeout(timeout, self.run_steps(query, &mut ctx)).await;
        let results = match finished {
            Ok(outcome) => outcome?,
            Err(_) => self.partial_results(query, &mut ctx)?,
        };

        info!(
            generation,
            results = results.len(),
            searches = ctx.stats.search_calls,
            failed_searches = ctx.stats.failed_searches,
            batches = ctx.stats.batches,
            failed_batches = ctx.stats.failed_batches,
            timed_out = ctx.stats.timed_out,
            "search finished"
        );

        Ok(SearchOutcome {
            results,
            stats: ctx.stats,
        })
    }

    /// Rank what was measured before the timeout fired.
    ///
    /// Fails with [`PipelineError::Timeout`] when nothing within the budget
    /// was measured yet.
    fn partial_results(
        &self,
        query: &SearchQuery,
        ctx: &mut RunContext,
    ) -> Result<Vec<RankedResult>, PipelineError> {
        let timeout = self.config.timeout;
        ctx.ensure_current()?;

        let measured = std::mem::take(&mut ctx.measured);
        let before = measured.len();
        let ranked = rank_within_budget(measured, query.time_budget_mins());

        if ranked.is_empty() {
            warn!(generation = ctx.generation(), ?timeout, "search timed out");
            return Err(PipelineError::Timeout(timeout));
        }

        warn!(
            generation = ctx.generation(),
            ?timeout,
            results = ranked.len(),
            "search timed out, returning partial results"
        );
        ctx.stats.out_of_range = before - ranked.len();
        ctx.stats.timed_out = true;
        Ok(ranked)
    }

    async fn run_steps(
        &self,
        query: &SearchQuery,
        ctx: &mut RunContext,
    ) -> Result<Vec<RankedResult>, PipelineError> {
        let profile = self.config.categories.profile(query.category());
        let radii = self.config.search_radii(query.time_budget_mins());

        let candidates = find_candidates(
            &self.places,
            query,
            profile,
            &radii,
            self.config.search_delay,
            ctx,
        )
        .await?;

        let candidates = classify_and_filter(&self.classifier, profile, candidates, ctx);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        measure_driving_times(
            &self.matrix,
            query.origin(),
            candidates,
            self.config.effective_batch_size(),
            self.config.batch_delay,
            ctx,
        )
        .await?;

        let measured = std::mem::take(&mut ctx.measured);
        let before = measured.len();
        let ranked = rank_within_budget(measured, query.time_budget_mins());
        ctx.stats.out_of_range = before - ranked.len();

        Ok(ranked)
    }
}
