//! Per-run state: the generation guard and run statistics.
//!
//! Starting a new search bumps a shared generation counter. A run holds the
//! token it was started with and checks it around every provider call; once
//! a newer search has begun, the older run stops applying results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::domain::RankedResult;

use super::search::PipelineError;

/// Monotonic search generation counter, shared by every run of one client.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    current: Arc<AtomicU64>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding all earlier tokens.
    pub fn begin(&self) -> GenerationToken {
        let id = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationToken {
            id,
            current: Arc::clone(&self.current),
        }
    }

    /// The most recently started generation (0 before any search).
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}

/// Proof of which generation a run belongs to.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    id: u64,
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    /// A token on its own private counter; it is never superseded.
    pub fn detached() -> Self {
        Generations::new().begin()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether no newer search has started since this token was issued.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.id
    }
}

/// Counters collected while a run progresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Place-search calls issued.
    pub search_calls: usize,
    /// Place-search calls that failed and contributed nothing.
    pub failed_searches: usize,
    /// Records returned across all searches, before deduplication.
    pub raw_candidates: usize,
    /// Records left after deduplication.
    pub unique_candidates: usize,
    /// Records dropped by the exclusion list.
    pub excluded: usize,
    /// Records dropped for lacking a label.
    pub unclassified: usize,
    /// Distance-matrix calls issued.
    pub batches: usize,
    /// Distance-matrix calls that failed as a whole.
    pub failed_batches: usize,
    /// Destinations with no driving time.
    pub unreachable: usize,
    /// Results over the time budget.
    pub out_of_range: usize,
    /// The run hit its timeout and the results are partial.
    pub timed_out: bool,
}

/// Explicit state threaded through every step of one run.
#[derive(Debug)]
pub struct RunContext {
    token: GenerationToken,
    pub stats: RunStats,

    /// Driving times measured so far, in candidate order.
    pub measured: Vec<RankedResult>,
}

impl RunContext {
    pub fn new(token: GenerationToken) -> Self {
        Self {
            token,
            stats: RunStats::default(),
            measured: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.token.id()
    }

    /// Fail with [`PipelineError::Superseded`] if a newer search started.
    pub fn ensure_current(&self) -> Result<(), PipelineError> {
        if self.token.is_current() {
            Ok(())
        } else {
            Err(PipelineError::Superseded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_monotonic() {
        let generations = Generations::new();
        assert_eq!(generations.current(), 0);

        let first = generations.begin();
        let second = generations.begin();
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
        assert_eq!(generations.current(), 2);
    }

    #[test]
    fn newer_search_supersedes_older() {
        let generations = Generations::new();
        let first = generations.begin();
        assert!(first.is_current());

        let second = generations.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn clones_share_the_counter() {
        let generations = Generations::new();
        let token = generations.begin();
        generations.clone().begin();
        assert!(!token.is_current());
    }

    #[test]
    fn detached_tokens_are_independent() {
        let a = GenerationToken::detached();
        let b = GenerationToken::detached();
        assert!(a.is_current());
        assert!(b.is_current());
    }

    #[test]
    fn context_reports_superseded() {
        let generations = Generations::new();
        let ctx = RunContext::new(generations.begin());
        assert!(ctx.ensure_current().is_ok());
        assert_eq!(ctx.generation(), 1);

        generations.begin();
        assert!(matches!(ctx.ensure_current(), Err(PipelineError::Superseded)));
    }
}
