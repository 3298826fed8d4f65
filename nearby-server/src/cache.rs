//! Result cache for completed searches.
//!
//! A finished search is stored under its canonical query key and served
//! again without touching either provider. Entries never expire; the cache
//! lives as long as the process.

use std::sync::Arc;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Category, CoordinateKey, RankedResult};
use crate::pipeline::{
    DistanceMatrix, GenerationToken, Pipeline, PipelineError, PlaceSearch, RunStats, SearchQuery,
};

/// Canonical cache key: rounded origin, time budget and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub origin: CoordinateKey,
    pub time_budget_mins: u32,
    pub category: Category,
}

impl From<&SearchQuery> for QueryKey {
    fn from(query: &SearchQuery) -> Self {
        Self {
            origin: query.origin().key(),
            time_budget_mins: query.time_budget_mins(),
            category: query.category(),
        }
    }
}

/// Cached result list.
type Entry = Arc<Vec<RankedResult>>;

/// Configuration for the result cache.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Maximum number of cached searches. `None` means unbounded.
    pub max_capacity: Option<u64>,
}

impl CacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }
}

/// Ranked results keyed by [`QueryKey`].
pub struct ResultCache {
    entries: MokaCache<QueryKey, Entry>,
}

impl ResultCache {
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = MokaCache::builder();
        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        Self {
            entries: builder.build(),
        }
    }

    pub async fn get(&self, key: &QueryKey) -> Option<Entry> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: QueryKey, entry: Entry) {
        self.entries.insert(key, entry).await;
    }

    /// Approximate number of entries (moka updates this lazily).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

/// Outcome of a cached search.
#[derive(Debug, Clone)]
pub struct CachedOutcome {
    pub results: Arc<Vec<RankedResult>>,

    /// Statistics of the run that produced the results; `None` on a hit.
    pub stats: Option<RunStats>,

    pub cached: bool,
}

/// Pipeline with a result cache in front of it.
pub struct CachedPipeline<P, D> {
    pipeline: Pipeline<P, D>,
    cache: ResultCache,
}

impl<P, D> CachedPipeline<P, D>
where
    P: PlaceSearch + Sync,
    D: DistanceMatrix + Sync,
{
    pub fn new(pipeline: Pipeline<P, D>, cache_config: &CacheConfig) -> Self {
        Self {
            pipeline,
            cache: ResultCache::new(cache_config),
        }
    }

    /// Serve `query` from the cache, or run the pipeline and remember the
    /// results.
    ///
    /// Failed, superseded and timed-out (partial) runs are not stored.
    pub async fn search(
        &self,
        query: &SearchQuery,
        token: GenerationToken,
    ) -> Result<CachedOutcome, PipelineError> {
        let key = QueryKey::from(query);

        if let Some(results) = self.cache.get(&key).await {
            debug!(
                origin = %query.origin(),
                budget_mins = query.time_budget_mins(),
                entries = self.cache.entry_count(),
                "cache hit"
            );
            return Ok(CachedOutcome {
                results,
                stats: None,
                cached: true,
            });
        }

        let outcome = self.pipeline.run(query, token).await?;
        let results = Arc::new(outcome.results);
        if outcome.stats.timed_out {
            debug!(origin = %query.origin(), "partial results not cached");
        } else {
            self.cache.insert(key, results.clone()).await;
        }

        Ok(CachedOutcome {
            results,
            stats: Some(outcome.stats),
            cached: false,
        })
    }

    /// Access the underlying pipeline.
    pub fn pipeline(&self) -> &Pipeline<P, D> {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::pipeline::testing::{ScriptedMatrix, ScriptedPlaces, place};
    use crate::pipeline::{Generations, PipelineConfig};

    type Scripted = CachedPipeline<ScriptedPlaces, ScriptedMatrix>;

    fn cached(places: ScriptedPlaces, matrix: ScriptedMatrix) -> Scripted {
        let config = PipelineConfig::default().without_pacing();
        let pipeline = Pipeline::new(places, matrix, config).unwrap();
        CachedPipeline::new(pipeline, &CacheConfig::default())
    }

    fn parking_setup() -> Scripted {
        let lot = place("lot", "Cyberport Car Park", 1);
        let places = ScriptedPlaces::new().respond("car park", vec![lot.clone()]);
        let matrix = ScriptedMatrix::new().minutes(&lot, 6);
        cached(places, matrix)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_capacity, None);
        assert_eq!(config.with_max_capacity(10).max_capacity, Some(10));
    }

    #[test]
    fn key_ignores_input_formatting() {
        let a = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();
        let b = SearchQuery::parse(" 22.28986750 , 113.9412633 ", " 15 ", "PARKING").unwrap();
        assert_eq!(QueryKey::from(&a), QueryKey::from(&b));
    }

    #[test]
    fn key_includes_category_and_budget() {
        let parking = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();
        let residential =
            SearchQuery::parse("22.2898675,113.9412633", "15", "residential").unwrap();
        let longer = SearchQuery::parse("22.2898675,113.9412633", "20", "parking").unwrap();

        assert_ne!(QueryKey::from(&parking), QueryKey::from(&residential));
        assert_ne!(QueryKey::from(&parking), QueryKey::from(&longer));
    }

    #[tokio::test]
    async fn second_search_makes_no_provider_calls() {
        let cached = parking_setup();
        let query = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();

        let first = cached.search(&query, GenerationToken::detached()).await.unwrap();
        assert!(!first.cached);
        assert!(first.stats.is_some());
        let places_calls = cached.pipeline().places().call_count();
        let matrix_calls = cached.pipeline().matrix().call_count();

        let second = cached.search(&query, GenerationToken::detached()).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.stats, None);
        assert_eq!(first.results, second.results);
        assert_eq!(cached.pipeline().places().call_count(), places_calls);
        assert_eq!(cached.pipeline().matrix().call_count(), matrix_calls);
    }

    #[tokio::test]
    async fn equivalent_input_hits_cache() {
        let cached = parking_setup();
        let plain = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();
        let padded = SearchQuery::parse("22.2898675 ,113.9412633 ", "15", "parking").unwrap();

        cached.search(&plain, GenerationToken::detached()).await.unwrap();
        let again = cached.search(&padded, GenerationToken::detached()).await.unwrap();

        assert!(again.cached);
    }

    #[tokio::test]
    async fn different_category_misses() {
        let cached = parking_setup();
        let parking = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();
        let residential =
            SearchQuery::parse("22.2898675,113.9412633", "15", "residential").unwrap();

        cached.search(&parking, GenerationToken::detached()).await.unwrap();
        let other = cached
            .search(&residential, GenerationToken::detached())
            .await
            .unwrap();

        assert!(!other.cached);
    }

    #[tokio::test]
    async fn superseded_run_is_not_cached() {
        let generations = Generations::new();
        let places = ScriptedPlaces::new().superseding_at(1, generations.clone());
        let cached = cached(places, ScriptedMatrix::new());
        let query = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();

        let result = cached.search(&query, generations.begin()).await;
        assert!(matches!(result, Err(PipelineError::Superseded)));

        let retry = cached.search(&query, generations.begin()).await.unwrap();
        assert!(!retry.cached);
    }

    #[tokio::test(start_paused = true)]
    async fn partial_results_are_not_cached() {
        let lots: Vec<_> = (1..=30)
            .map(|i| place(&format!("lot{i}"), &format!("Car Park {i}"), i))
            .collect();
        let places = ScriptedPlaces::new().respond("parking", lots.clone());
        let matrix = lots
            .iter()
            .fold(ScriptedMatrix::new(), |m, lot| m.minutes(lot, 5))
            .with_delay(Duration::from_secs(20));
        let config = PipelineConfig::default()
            .without_pacing()
            .with_timeout(Duration::from_secs(30));
        let cached = CachedPipeline::new(
            Pipeline::new(places, matrix, config).unwrap(),
            &CacheConfig::default(),
        );
        let query = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();

        let first = cached.search(&query, GenerationToken::detached()).await.unwrap();
        assert!(first.stats.is_some_and(|s| s.timed_out));

        let second = cached.search(&query, GenerationToken::detached()).await.unwrap();
        assert!(!second.cached);
    }
}
