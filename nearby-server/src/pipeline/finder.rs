//! Candidate finding and deduplication.
//!
//! Every (radius, keyword) pair is searched in turn, one call at a time,
//! with a fixed pause between calls. All radii are searched; there is no
//! early stop on the first non-empty radius.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::CandidateRecord;

use super::config::CategoryProfile;
use super::context::RunContext;
use super::provider::{NearbyRequest, PlaceSearch};
use super::query::SearchQuery;
use super::search::PipelineError;

/// Merges records by identifier, keeping the first one seen.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
    records: Vec<CandidateRecord>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record unless its identifier was already seen.
    ///
    /// Returns `true` if the record was kept. Later duplicates are
    /// discarded whole; their fields are never merged in.
    pub fn push(&mut self, record: CandidateRecord) -> bool {
        if self.seen.contains(&record.id) {
            return false;
        }
        self.seen.insert(record.id.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Kept records in first-seen order.
    pub fn into_records(self) -> Vec<CandidateRecord> {
        self.records
    }
}

/// Deduplicate a sequence of records by identifier, first occurrence wins.
pub fn dedup_by_id(records: impl IntoIterator<Item = CandidateRecord>) -> Vec<CandidateRecord> {
    let mut dedup = Deduplicator::new();
    for record in records {
        dedup.push(record);
    }
    dedup.into_records()
}

/// Search every radius and keyword of `profile`, returning unique candidates.
///
/// A failed search is logged and contributes nothing; the remaining
/// searches still run.
pub(crate) async fn find_candidates<P: PlaceSearch>(
    places: &P,
    query: &SearchQuery,
    profile: &CategoryProfile,
    radii: &[u32],
    pacing: Duration,
    ctx: &mut RunContext,
) -> Result<Vec<CandidateRecord>, PipelineError> {
    let mut dedup = Deduplicator::new();
    let mut first_call = true;

    for &radius_m in radii {
        debug!(radius_m, "searching radius");

        for group in &profile.groups {
            for keyword in &group.keywords {
                if !first_call && !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                    ctx.ensure_current()?;
                }
                first_call = false;

                let request = NearbyRequest {
                    origin: query.origin(),
                    radius_m,
                    keyword: keyword.clone(),
                    type_hint: group.type_hint.clone(),
                };

                ctx.stats.search_calls += 1;
                let outcome = places.nearby(&request).await;
                ctx.ensure_current()?;

                match outcome {
                    Ok(records) => {
                        ctx.stats.raw_candidates += records.len();
                        let before = dedup.len();
                        for mut record in records {
                            record.label = group.label;
                            dedup.push(record);
                        }
                        debug!(
                            keyword = %keyword,
                            radius_m,
                            new = dedup.len() - before,
                            total = dedup.len(),
                            "search returned"
                        );
                    }
                    Err(e) => {
                        ctx.stats.failed_searches += 1;
                        warn!(keyword = %keyword, radius_m, error = %e, "place search failed");
                    }
                }
            }
        }
    }

    ctx.stats.unique_candidates = dedup.len();
    Ok(dedup.into_records())
}
