//! Places found by search and the ranked results built from them.

use serde::Serialize;

use super::{Coordinate, Label, TravelTime};

/// Display text used when a place has no address.
pub const NO_ADDRESS: &str = "No address";

/// A place returned by the place-search provider, not yet known to be
/// within the driving-time budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Provider-assigned unique identifier.
    pub id: String,

    pub name: String,

    /// Vicinity or street address, when the provider has one.
    pub address: Option<String>,

    pub location: Coordinate,

    /// Provider type tags (e.g. `"parking"`, `"lodging"`).
    pub types: Vec<String>,

    /// Label carried over from the search that found this place.
    pub label: Option<Label>,
}

impl CandidateRecord {
    /// Create an unlabelled record with no type tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: None,
            location,
            types: Vec::new(),
            label: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    /// Name and address joined, for keyword matching.
    pub fn searchable_text(&self) -> String {
        match &self.address {
            Some(address) => format!("{} {}", self.name, address),
            None => self.name.clone(),
        }
    }
}

/// A place confirmed to be reachable, with its driving time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub name: String,
    pub address: Option<String>,
    pub label: Option<Label>,
    pub travel: TravelTime,
}

impl RankedResult {
    /// Build a result from a candidate and its measured driving time.
    pub fn new(record: CandidateRecord, travel: TravelTime) -> Self {
        Self {
            name: record.name,
            address: record.address,
            label: record.label,
            travel,
        }
    }

    /// Driving time in whole minutes.
    pub fn minutes(&self) -> u32 {
        self.travel.minutes()
    }

    /// Address for display, with a placeholder when missing.
    pub fn display_address(&self) -> &str {
        self.address.as_deref().unwrap_or(NO_ADDRESS)
    }

    /// Label for display; empty when unclassified.
    pub fn display_label(&self) -> &str {
        self.label.map(|l| l.as_str()).unwrap_or("")
    }
}
