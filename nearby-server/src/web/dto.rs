//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::cache::CachedOutcome;
use crate::domain::RankedResult;
use crate::pipeline::{InvalidInput, RunStats, SearchQuery};

/// Category used when the request does not name one.
const DEFAULT_CATEGORY: &str = "parking";

const PARTIAL_NOTICE: &str = "Search timed out; showing the places measured so far.";

/// Query string of a search or export request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// `"lat,lng"`
    pub coordinates: Option<String>,

    /// Time budget in minutes
    pub time: Option<String>,

    /// `parking`, `residential` or `mixed` (defaults to `parking`)
    pub category: Option<String>,
}

impl SearchParams {
    /// Normalize into a validated query.
    pub fn to_query(&self) -> Result<SearchQuery, InvalidInput> {
        SearchQuery::parse(
            self.coordinates.as_deref().unwrap_or(""),
            self.time.as_deref().unwrap_or(""),
            self.category.as_deref().unwrap_or(DEFAULT_CATEGORY),
        )
    }
}

/// One ranked place.
#[derive(Debug, Serialize)]
pub struct ResultItem {
    pub name: String,

    /// Address, or `"No address"`
    pub address: String,

    /// Label text, empty when unclassified
    pub category: String,

    /// e.g. `"10 mins"`
    pub driving_time: String,

    pub driving_minutes: u32,
}

impl ResultItem {
    pub fn from_result(result: &RankedResult) -> Self {
        Self {
            name: result.name.clone(),
            address: result.display_address().to_string(),
            category: result.display_label().to_string(),
            driving_time: result.travel.text().to_string(),
            driving_minutes: result.minutes(),
        }
    }
}

/// Response to a search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Shortest drive first
    pub results: Vec<ResultItem>,

    /// Whether the results came from the cache
    pub cached: bool,

    /// Statistics of the run; absent for cached results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RunStats>,

    /// Message for the user when the results are incomplete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SearchResponse {
    pub fn from_outcome(outcome: &CachedOutcome) -> Self {
        let timed_out = outcome.stats.as_ref().is_some_and(|s| s.timed_out);
        Self {
            results: outcome.results.iter().map(ResultItem::from_result).collect(),
            cached: outcome.cached,
            stats: outcome.stats.clone(),
            notice: timed_out.then(|| PARTIAL_NOTICE.to_string()),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
