//! Pipeline configuration: radii, pacing, batching and the category table.

use std::time::Duration;

use crate::domain::{Category, Label};

/// Most destinations the distance-matrix provider accepts per request.
pub const MAX_DESTINATIONS_PER_BATCH: usize = 25;

/// Escalating search radii in metres.
const DEFAULT_RADII_M: [u32; 6] = [1_000, 2_000, 5_000, 10_000, 20_000, 50_000];

/// Configuration parameters for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Escalating radii to search, in metres. Radii beyond the driving
    /// bound are skipped. `None` searches a single radius equal to the bound.
    pub radii: Option<Vec<u32>>,

    /// Hard cap on any search radius, in metres.
    pub max_radius_m: u32,

    /// Mean driving speed used to turn a time budget into a radius.
    pub assumed_speed_kmh: u32,

    /// Pause between consecutive place-search calls.
    pub search_delay: Duration,

    /// Pause between consecutive distance-matrix batches.
    pub batch_delay: Duration,

    /// Destinations per distance-matrix request (at most 25).
    pub batch_size: usize,

    /// Wall-clock budget for a whole run.
    pub timeout: Duration,

    /// Keywords, hints and exclusions per category.
    pub categories: CategoryTable,
}

impl PipelineConfig {
    /// Search with the given escalating radii.
    pub fn with_radii(mut self, radii: Vec<u32>) -> Self {
        self.radii = Some(radii);
        self
    }

    /// Search a single radius derived from the time budget.
    pub fn with_derived_radius(mut self) -> Self {
        self.radii = None;
        self
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    /// Drop all inter-call pauses (fixtures and tests).
    pub fn without_pacing(self) -> Self {
        self.with_search_delay(Duration::ZERO)
            .with_batch_delay(Duration::ZERO)
    }

    /// Farthest distance reachable within the budget at the assumed
    /// speed, capped at `max_radius_m`.
    pub fn radius_bound_m(&self, time_budget_mins: u32) -> u32 {
        let metres =
            u64::from(time_budget_mins) * u64::from(self.assumed_speed_kmh) * 1_000 / 60;
        let capped = metres.min(u64::from(self.max_radius_m));
        u32::try_from(capped).unwrap_or(self.max_radius_m).max(1)
    }

    /// Radii to search for the given budget, ascending.
    ///
    /// Always returns at least one radius: if no configured radius fits
    /// under the bound, the bound itself is used.
    pub fn search_radii(&self, time_budget_mins: u32) -> Vec<u32> {
        let bound = self.radius_bound_m(time_budget_mins);

        let Some(configured) = &self.radii else {
            return vec![bound];
        };

        let mut radii: Vec<u32> = configured
            .iter()
            .copied()
            .filter(|&r| r > 0 && r <= bound)
            .collect();
        radii.sort_unstable();
        radii.dedup();

        if radii.is_empty() {
            radii.push(bound);
        }
        radii
    }

    /// Effective batch size, clamped to what the provider accepts.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_DESTINATIONS_PER_BATCH)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            radii: Some(DEFAULT_RADII_M.to_vec()),
            max_radius_m: 50_000,
            assumed_speed_kmh: 60,
            search_delay: Duration::from_millis(200),
            batch_delay: Duration::from_millis(200),
            batch_size: MAX_DESTINATIONS_PER_BATCH,
            timeout: Duration::from_secs(30),
            categories: CategoryTable::default(),
        }
    }
}

/// One set of keyword searches sharing a provider hint and label.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroup {
    /// Keyword synonyms, each searched separately.
    pub keywords: Vec<String>,

    /// Provider place type to restrict the search to.
    pub type_hint: Option<String>,

    /// Label given to every place this group finds.
    pub label: Option<Label>,
}

impl SearchGroup {
    fn new(keywords: &[&str], type_hint: Option<&str>, label: Option<Label>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            type_hint: type_hint.map(str::to_string),
            label,
        }
    }
}

/// Search recipe for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryProfile {
    pub groups: Vec<SearchGroup>,

    /// Case-insensitive substrings that disqualify a place by name.
    pub exclude_terms: Vec<String>,

    /// Drop places the classifier cannot label.
    pub require_label: bool,
}

impl CategoryProfile {
    /// Number of keyword searches per radius.
    pub fn searches_per_radius(&self) -> usize {
        self.groups.iter().map(|g| g.keywords.len()).sum()
    }
}

/// Profiles for every category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    pub parking: CategoryProfile,
    pub residential: CategoryProfile,
    pub mixed: CategoryProfile,
}

impl CategoryTable {
    pub fn profile(&self, category: Category) -> &CategoryProfile {
        match category {
            Category::Parking => &self.parking,
            Category::Residential => &self.residential,
            Category::Mixed => &self.mixed,
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let parking = CategoryProfile {
            groups: vec![SearchGroup::new(
                &[
                    "停車場",
                    "泊車場",
                    "室內停車場",
                    "地下停車場",
                    "car park",
                    "parking",
                    "indoor parking",
                    "underground parking",
                ],
                Some("parking"),
                Some(Label::Parking),
            )],
            exclude_terms: [
                "路邊",
                "單車",
                "傷殘",
                "電單車",
                "臨時",
                "roadside",
                "motorcycle",
                "bicycle",
                "disabled",
                "temporary",
            ]
            .iter()
            .map(|t| (*t).to_string())
            .collect(),
            require_label: false,
        };

        let residential = CategoryProfile {
            groups: vec![SearchGroup::new(
                &[
                    "屋苑",
                    "住宅",
                    "大廈",
                    "樓",
                    "苑",
                    "村",
                    "村屋",
                    "私人住宅",
                    "公共住宅",
                    "estate",
                    "residential",
                    "apartment",
                    "housing",
                    "mansion",
                    "tower",
                ],
                None,
                Some(Label::Residential),
            )],
            exclude_terms: Vec::new(),
            require_label: false,
        };

        let mixed = CategoryProfile {
            groups: vec![
                SearchGroup::new(
                    &["屋苑", "住宅", "estate", "housing"],
                    None,
                    Some(Label::Residential),
                ),
                SearchGroup::new(
                    &["商場", "shopping mall"],
                    Some("shopping_mall"),
                    Some(Label::Shopping),
                ),
                SearchGroup::new(&["酒店", "hotel"], Some("lodging"), Some(Label::Lodging)),
                SearchGroup::new(&["停車場", "car park"], Some("parking"), Some(Label::Parking)),
                SearchGroup::new(
                    &["政府大樓", "government office"],
                    Some("local_government_office"),
                    Some(Label::Government),
                ),
                SearchGroup::new(&["大廈", "building"], None, None),
            ],
            exclude_terms: Vec::new(),
            require_label: true,
        };

        Self {
            parking,
            residential,
            mixed,
        }
    }
}
