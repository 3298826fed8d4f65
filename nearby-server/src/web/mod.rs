//! Web layer for the nearby place finder.
//!
//! Provides JSON and CSV endpoints over the cached search pipeline.

mod dto;
mod routes;
mod session;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use session::{SESSION_HEADER, Sessions};
pub use state::{AppState, SearchService};
