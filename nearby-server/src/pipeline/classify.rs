//! Category classification and exclusion.
//!
//! Classification is an ordered list of rules, each a pure function from a
//! record to an optional label. The first rule that yields a label wins.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::domain::{CandidateRecord, Label};

use super::config::CategoryProfile;
use super::context::RunContext;

/// Provider type tags with a direct label.
const TYPE_LABELS: &[(&str, Label)] = &[
    ("parking", Label::Parking),
    ("lodging", Label::Lodging),
    ("shopping_mall", Label::Shopping),
    ("department_store", Label::Shopping),
    ("supermarket", Label::Shopping),
    ("local_government_office", Label::Government),
    ("city_hall", Label::Government),
    ("courthouse", Label::Government),
    ("post_office", Label::Government),
    ("police", Label::Government),
    ("premise", Label::Residential),
];

/// Name/address keywords per label, tried in this order.
const KEYWORD_LABELS: &[(Label, &[&str])] = &[
    (
        Label::Parking,
        &["停車場", "泊車", "car park", "carpark", "parking"],
    ),
    (
        Label::Lodging,
        &["酒店", "賓館", "旅館", "hotel", "hostel", "inn", "resort"],
    ),
    (
        Label::Shopping,
        &["商場", "購物", "shopping", "mall", "plaza", "market"],
    ),
    (
        Label::Government,
        &["政府", "市政", "government", "municipal", "council", "civic"],
    ),
    (
        Label::Residential,
        &[
            "屋苑", "住宅", "大廈", "花園", "村屋", "estate", "residential", "apartment",
            "housing", "mansion", "tower", "court", "garden",
        ],
    ),
];

/// One classification step.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The label assigned by the search that found the record.
    PresetLabel,

    /// Exact match of any provider type tag.
    TypeTags(HashMap<String, Label>),

    /// Case-insensitive match against name and address.
    Keywords(Vec<(Label, Regex)>),
}

impl Rule {
    pub fn apply(&self, record: &CandidateRecord) -> Option<Label> {
        match self {
            Rule::PresetLabel => record.label,
            Rule::TypeTags(table) => record.types.iter().find_map(|t| table.get(t).copied()),
            Rule::Keywords(patterns) => {
                let text = record.searchable_text();
                patterns
                    .iter()
                    .find(|(_, re)| re.is_match(&text))
                    .map(|(label, _)| *label)
            }
        }
    }
}

/// Build a case-insensitive pattern matching any of `terms` literally.
pub fn keyword_pattern(terms: &[&str]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
    RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
}

/// Ordered rule list.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Preset label, then type tags, then keywords.
    pub fn standard() -> Result<Self, regex::Error> {
        let types = TYPE_LABELS
            .iter()
            .map(|(tag, label)| ((*tag).to_string(), *label))
            .collect();

        let keywords = KEYWORD_LABELS
            .iter()
            .map(|(label, terms)| Ok((*label, keyword_pattern(terms)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self::new(vec![
            Rule::PresetLabel,
            Rule::TypeTags(types),
            Rule::Keywords(keywords),
        ]))
    }

    /// First label any rule yields, or `None` for unclassified.
    pub fn classify(&self, record: &CandidateRecord) -> Option<Label> {
        self.rules.iter().find_map(|rule| rule.apply(record))
    }
}

/// Whether `name` contains any of `terms`, ignoring case.
pub fn is_excluded(name: &str, terms: &[String]) -> bool {
    let name = name.to_lowercase();
    terms.iter().any(|t| name.contains(&t.to_lowercase()))
}

/// Label every record, then drop excluded and (if required) unlabelled ones.
pub(crate) fn classify_and_filter(
    classifier: &Classifier,
    profile: &CategoryProfile,
    records: Vec<CandidateRecord>,
    ctx: &mut RunContext,
) -> Vec<CandidateRecord> {
    let mut kept = Vec::with_capacity(records.len());

    for mut record in records {
        record.label = classifier.classify(&record);

        if is_excluded(&record.name, &profile.exclude_terms) {
            debug!(name = %record.name, "excluded by name");
            ctx.stats.excluded += 1;
            continue;
        }

        if profile.require_label && record.label.is_none() {
            debug!(name = %record.name, "dropped unclassified");
            ctx.stats.unclassified += 1;
            continue;
        }

        kept.push(record);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::pipeline::config::CategoryTable;
    use crate::pipeline::context::GenerationToken;
    use crate::pipeline::testing::place;

    fn classifier() -> Classifier {
        Classifier::standard().unwrap()
    }

    #[test]
    fn preset_label_wins() {
        let record = place("a", "Grand Hotel", 1)
            .with_types(["lodging"])
            .with_label(Label::Residential);
        assert_eq!(classifier().classify(&record), Some(Label::Residential));
    }

    #[test]
    fn type_tag_beats_keywords() {
        let record = place("a", "Harbour Hotel", 1).with_types(["establishment", "parking"]);
        assert_eq!(classifier().classify(&record), Some(Label::Parking));
    }

    #[test]
    fn unknown_type_tags_fall_through() {
        let record = place("a", "Nothing Special", 1).with_types(["point_of_interest"]);
        assert_eq!(classifier().classify(&record), None);
    }

    #[test]
    fn keywords_match_name_case_insensitively() {
        let record = place("a", "SEAVIEW HOTEL", 1);
        assert_eq!(classifier().classify(&record), Some(Label::Lodging));
    }

    #[test]
    fn keywords_match_address() {
        let record = place("a", "Block 3", 1).with_address("Baguio Villa Estate");
        assert_eq!(classifier().classify(&record), Some(Label::Residential));
    }

    #[test]
    fn chinese_keywords() {
        assert_eq!(
            classifier().classify(&place("a", "數碼港商場", 1)),
            Some(Label::Shopping)
        );
        assert_eq!(
            classifier().classify(&place("b", "置富花園", 2)),
            Some(Label::Residential)
        );
    }

    #[test]
    fn keyword_rules_are_ordered() {
        // Matches both parking and residential keywords; parking is tried first.
        let record = place("a", "Tower 2 Car Park", 1);
        assert_eq!(classifier().classify(&record), Some(Label::Parking));
    }

    #[test]
    fn keyword_pattern_escapes_terms() {
        let re = keyword_pattern(&["a.b", "c+"]).unwrap();
        assert!(re.is_match("xx A.B yy"));
        assert!(!re.is_match("axb"));
        assert!(re.is_match("C+"));
    }

    #[test]
    fn custom_rule_list() {
        let classifier = Classifier::new(vec![Rule::PresetLabel]);
        assert_eq!(classifier.classify(&place("a", "Hotel", 1)), None);
    }

    #[test]
    fn exclusion_is_case_insensitive_substring() {
        let terms = vec!["motorcycle".to_string(), "傷殘".to_string()];
        assert!(is_excluded("ABC Motorcycle Parking", &terms));
        assert!(is_excluded("傷殘人士車位", &terms));
        assert!(!is_excluded("XYZ Indoor Parking", &terms));
        assert!(!is_excluded("Anything", &[]));
    }

    #[test]
    fn parking_profile_drops_denylisted_names() {
        let table = CategoryTable::default();
        let mut ctx = RunContext::new(GenerationToken::detached());
        let records = vec![
            place("1", "XYZ Indoor Parking", 1).with_label(Label::Parking),
            place("2", "ABC Motorcycle Parking", 2).with_label(Label::Parking),
            place("3", "Roadside Bays", 3).with_label(Label::Parking),
            place("4", "電單車停車場", 4).with_label(Label::Parking),
        ];

        let kept = classify_and_filter(
            &classifier(),
            table.profile(Category::Parking),
            records,
            &mut ctx,
        );

        let names: Vec<&str> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["XYZ Indoor Parking"]);
        assert_eq!(ctx.stats.excluded, 3);
    }

    #[test]
    fn residential_profile_keeps_unclassified() {
        let table = CategoryTable::default();
        let mut ctx = RunContext::new(GenerationToken::detached());
        let records = vec![place("1", "Motorcycle Club", 1)];

        let kept = classify_and_filter(
            &classifier(),
            table.profile(Category::Residential),
            records,
            &mut ctx,
        );

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].label, None);
        assert_eq!(ctx.stats.excluded, 0);
    }

    #[test]
    fn mixed_profile_drops_unclassified() {
        let table = CategoryTable::default();
        let mut ctx = RunContext::new(GenerationToken::detached());
        let records = vec![
            place("1", "Cyberport Arcade Mall", 1),
            place("2", "Unit 12", 2),
            place("3", "Block A", 3).with_types(["premise"]),
        ];

        let kept = classify_and_filter(
            &classifier(),
            table.profile(Category::Mixed),
            records,
            &mut ctx,
        );

        let labels: Vec<Option<Label>> = kept.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![Some(Label::Shopping), Some(Label::Residential)]);
        assert_eq!(ctx.stats.unclassified, 1);
    }
}
