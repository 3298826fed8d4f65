//! Domain types for the nearby place finder.
//!
//! These types represent validated search data. Types with invariants
//! enforce them at construction time, so code that receives them can
//! trust their validity.

mod category;
mod coordinate;
mod place;
mod travel;

pub use category::{Category, InvalidCategory, Label};
pub use coordinate::{Coordinate, CoordinateKey, InvalidCoordinate};
pub use place::{CandidateRecord, NO_ADDRESS, RankedResult};
pub use travel::TravelTime;
