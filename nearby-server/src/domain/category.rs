//! Search categories and result labels.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?} (expected parking, residential or mixed)")]
pub struct InvalidCategory(pub String);

/// What the user is looking for.
///
/// The category drives keyword selection, the exclusion list and whether
/// results must carry a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Parking,
    Residential,
    /// Several labelled place kinds in one search.
    Mixed,
}

impl Category {
    /// Parse a category name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidCategory> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parking" => Ok(Category::Parking),
            "residential" => Ok(Category::Residential),
            "mixed" => Ok(Category::Mixed),
            _ => Err(InvalidCategory(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Parking => "parking",
            Category::Residential => "residential",
            Category::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-facing label attached to a result.
///
/// A record with no label is "unclassified"; that is modelled as
/// `Option<Label>::None` rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Residential,
    Shopping,
    Lodging,
    Parking,
    Government,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Residential => "Residential",
            Label::Shopping => "Shopping",
            Label::Lodging => "Lodging",
            Label::Parking => "Parking",
            Label::Government => "Government facility",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Label {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
