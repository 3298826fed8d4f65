//! Nearby-place ranking pipeline.
//!
//! Answers: "which places of this kind can I drive to from here within
//! N minutes?" The steps run strictly in order:
//!
//! 1. normalize the input into a [`SearchQuery`]
//! 2. search every (radius, keyword) pair with the place-search provider
//! 3. deduplicate by provider identifier
//! 4. classify each place and apply the category's exclusion list
//! 5. look up driving times in batches of 25
//! 6. drop places over the budget and sort by driving time

mod batch;
mod classify;
mod config;
mod context;
mod finder;
mod provider;
mod query;
mod rank;
mod search;

#[cfg(test)]
pub(crate) mod testing;


pub use classify::{Classifier, Rule, is_excluded, keyword_pattern};
pub use config::{
    CategoryProfile, CategoryTable, MAX_DESTINATIONS_PER_BATCH, PipelineConfig, SearchGroup,
};
pub use context::{GenerationToken, Generations, RunContext, RunStats};
pub use finder::{Deduplicator, dedup_by_id};
pub use provider::{
    DistanceMatrix, ElementStatus, MatrixElement, NearbyRequest, PlaceSearch, ProviderError,
};
pub use query::{InvalidInput, SearchQuery};
pub use rank::{rank_by_driving_time, rank_within_budget, within_budget};
pub use search::{Pipeline, PipelineError, SearchOutcome};
