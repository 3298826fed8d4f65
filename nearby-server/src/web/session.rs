//! Per-client generation counters.
//!
//! A client that sends a new search while an older one is still running
//! abandons the older one. Clients identify themselves with the
//! `x-session-id` header; requests without it never supersede anything.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::pipeline::{GenerationToken, Generations};

/// Header carrying the client session identifier.
pub const SESSION_HEADER: &str = "x-session-id";

/// Idle sessions are forgotten after this long.
const SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Generation counters keyed by session identifier.
#[derive(Clone)]
pub struct Sessions {
    counters: MokaCache<String, Generations>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::with_idle_timeout(SESSION_IDLE)
    }

    pub fn with_idle_timeout(idle: Duration) -> Self {
        Self {
            counters: MokaCache::builder().time_to_idle(idle).build(),
        }
    }

    /// Start a new search for `session`, superseding its earlier ones.
    pub async fn begin(&self, session: Option<&str>) -> GenerationToken {
        match session {
            Some(id) => self
                .counters
                .get_with(id.to_string(), async { Generations::new() })
                .await
                .begin(),
            None => GenerationToken::detached(),
        }
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new()
    }
}
