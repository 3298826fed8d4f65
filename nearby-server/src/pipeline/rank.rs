//! Range filtering and ranking of measured results.

use crate::domain::RankedResult;

/// Keep results whose driving time is within `time_budget_mins`.
pub fn within_budget(mut results: Vec<RankedResult>, time_budget_mins: u32) -> Vec<RankedResult> {
    results.retain(|r| r.minutes() <= time_budget_mins);
    results
}

/// Sort results by driving time, shortest first.
///
/// The sort is stable: equal driving times keep their input order.
pub fn rank_by_driving_time(mut results: Vec<RankedResult>) -> Vec<RankedResult> {
    results.sort_by_key(RankedResult::minutes);
    results
}

/// Drop out-of-range results and rank the rest.
pub fn rank_within_budget(results: Vec<RankedResult>, time_budget_mins: u32) -> Vec<RankedResult> {
    rank_by_driving_time(within_budget(results, time_budget_mins))
}
