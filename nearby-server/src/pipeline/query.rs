//! Input normalization: raw form fields to a validated [`SearchQuery`].

use crate::domain::{Category, Coordinate, InvalidCategory, InvalidCoordinate};

/// Rejected user input. The pipeline never starts for these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    /// No coordinates were supplied
    #[error("coordinates are required")]
    MissingCoordinates,

    /// Coordinates were malformed or out of range
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    /// Time budget was not an integer
    #[error("time budget must be a whole number of minutes, got {0:?}")]
    TimeBudgetNotNumber(String),

    /// Time budget was zero or negative
    #[error("time budget must be a positive number of minutes")]
    TimeBudgetNotPositive,

    /// Category name was not recognised
    #[error(transparent)]
    Category(#[from] InvalidCategory),
}

/// A validated search request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    origin: Coordinate,
    time_budget_mins: u32,
    category: Category,
}

impl SearchQuery {
    /// Create a query from already-validated parts.
    pub fn new(
        origin: Coordinate,
        time_budget_mins: u32,
        category: Category,
    ) -> Result<Self, InvalidInput> {
        if time_budget_mins == 0 {
            return Err(InvalidInput::TimeBudgetNotPositive);
        }
        Ok(Self {
            origin,
            time_budget_mins,
            category,
        })
    }

    /// Parse raw form input.
    ///
    /// # Examples
    ///
    /// ```
    /// use nearby_server::domain::Category;
    /// use nearby_server::pipeline::SearchQuery;
    ///
    /// let q = SearchQuery::parse("22.2898675,113.9412633", "15", "parking").unwrap();
    /// assert_eq!(q.time_budget_mins(), 15);
    /// assert_eq!(q.category(), Category::Parking);
    ///
    /// assert!(SearchQuery::parse("", "15", "parking").is_err());
    /// assert!(SearchQuery::parse("22.2,113.9", "0", "parking").is_err());
    /// ```
    pub fn parse(
        coordinates: &str,
        time_budget: &str,
        category: &str,
    ) -> Result<Self, InvalidInput> {
        if coordinates.trim().is_empty() {
            return Err(InvalidInput::MissingCoordinates);
        }
        let origin = Coordinate::parse(coordinates)?;
        let time_budget_mins = parse_time_budget(time_budget)?;
        let category = Category::parse(category)?;

        Self::new(origin, time_budget_mins, category)
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Maximum acceptable driving time in minutes.
    pub fn time_budget_mins(&self) -> u32 {
        self.time_budget_mins
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

fn parse_time_budget(s: &str) -> Result<u32, InvalidInput> {
    let trimmed = s.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InvalidInput::TimeBudgetNotNumber(trimmed.to_string()))?;

    if value <= 0 {
        return Err(InvalidInput::TimeBudgetNotPositive);
    }

    u32::try_from(value).map_err(|_| InvalidInput::TimeBudgetNotNumber(trimmed.to_string()))
}
