//! Driving time between the search origin and a place.

use std::fmt;

use serde::Serialize;

/// A driving duration with whole minutes and a display string.
///
/// The minute count is authoritative for filtering and sorting. The text is
/// always derived from the minutes, so the two can never disagree.
///
/// # Examples
///
/// ```
/// use nearby_server::domain::TravelTime;
///
/// let t = TravelTime::from_seconds(610);
/// assert_eq!(t.minutes(), 10);
/// assert_eq!(t.text(), "10 mins");
///
/// let t = TravelTime::parse_text("1 hour 5 mins").unwrap();
/// assert_eq!(t.minutes(), 65);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TravelTime {
    minutes: u32,
    text: String,
}

impl TravelTime {
    /// Build from a whole number of minutes.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes,
            text: format_minutes(minutes),
        }
    }

    /// Build from a duration in seconds, rounded to the nearest minute.
    pub fn from_seconds(seconds: u64) -> Self {
        let minutes = seconds.saturating_add(30) / 60;
        Self::from_minutes(u32::try_from(minutes).unwrap_or(u32::MAX))
    }

    /// Parse a provider duration string such as `"10 mins"`,
    /// `"1 hour 5 mins"` or `"1 小時 5 分鐘"`.
    ///
    /// Returns `None` if the text contains anything other than
    /// number/unit pairs.
    pub fn parse_text(text: &str) -> Option<Self> {
        let mut rest = text.trim();
        let mut total: u64 = 0;
        let mut matched = false;

        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits_end == 0 {
                return None;
            }
            let amount: u64 = rest[..digits_end].parse().ok()?;
            rest = rest[digits_end..].trim_start();

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit() || c.is_whitespace())
                .unwrap_or(rest.len());
            let factor = unit_factor(&rest[..unit_end])?;
            rest = rest[unit_end..].trim_start();

            total = total.checked_add(amount.checked_mul(factor)?)?;
            matched = true;
        }

        matched.then(|| Self::from_minutes(u32::try_from(total).unwrap_or(u32::MAX)))
    }

    /// Whole minutes.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Display form, e.g. `"10 mins"`.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Minutes per unit word. English and Chinese unit names are accepted.
fn unit_factor(unit: &str) -> Option<u64> {
    let unit = unit.to_lowercase();
    if unit.starts_with("day") || unit.starts_with('天') {
        Some(24 * 60)
    } else if unit.starts_with("hour") || unit.starts_with("hr") || unit.starts_with("小時") {
        Some(60)
    } else if unit.starts_with("min") || unit.starts_with('分') {
        Some(1)
    } else {
        None
    }
}

fn format_minutes(minutes: u32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }

    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hour"),
        (h, m) => format!("{} {}", plural(h, "hour"), plural(m, "min")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_to_nearest_minute() {
        assert_eq!(TravelTime::from_seconds(0).minutes(), 0);
        assert_eq!(TravelTime::from_seconds(29).minutes(), 0);
        assert_eq!(TravelTime::from_seconds(30).minutes(), 1);
        assert_eq!(TravelTime::from_seconds(600).minutes(), 10);
        assert_eq!(TravelTime::from_seconds(629).minutes(), 10);
        assert_eq!(TravelTime::from_seconds(630).minutes(), 11);
    }

    #[test]
    fn huge_seconds_saturate() {
        assert_eq!(TravelTime::from_seconds(u64::MAX).minutes(), u32::MAX);
    }

    #[test]
    fn text_formatting() {
        assert_eq!(TravelTime::from_minutes(0).text(), "0 mins");
        assert_eq!(TravelTime::from_minutes(1).text(), "1 min");
        assert_eq!(TravelTime::from_minutes(10).text(), "10 mins");
        assert_eq!(TravelTime::from_minutes(60).text(), "1 hour");
        assert_eq!(TravelTime::from_minutes(61).text(), "1 hour 1 min");
        assert_eq!(TravelTime::from_minutes(125).text(), "2 hours 5 mins");
    }

    #[test]
    fn parse_english_text() {
        assert_eq!(TravelTime::parse_text("10 mins").unwrap().minutes(), 10);
        assert_eq!(TravelTime::parse_text("1 min").unwrap().minutes(), 1);
        assert_eq!(TravelTime::parse_text("1 hour 5 mins").unwrap().minutes(), 65);
        assert_eq!(TravelTime::parse_text("2 hours").unwrap().minutes(), 120);
        assert_eq!(TravelTime::parse_text("1 day 2 hours").unwrap().minutes(), 1560);
    }

    #[test]
    fn parse_chinese_text() {
        assert_eq!(TravelTime::parse_text("10 分鐘").unwrap().minutes(), 10);
        assert_eq!(TravelTime::parse_text("1 小時 5 分鐘").unwrap().minutes(), 65);
        assert_eq!(TravelTime::parse_text("12分鐘").unwrap().minutes(), 12);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TravelTime::parse_text("").is_none());
        assert!(TravelTime::parse_text("soon").is_none());
        assert!(TravelTime::parse_text("10 furlongs").is_none());
        assert!(TravelTime::parse_text("mins 10").is_none());
    }

    #[test]
    fn parsed_text_is_regenerated() {
        let t = TravelTime::parse_text("65 mins").unwrap();
        assert_eq!(t.text(), "1 hour 5 mins");
    }
}
