use crate::aggregate::Tally;
use crate::codec::Entry;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Calendar date in canonical `YYYY-MM-DD` form, ordered by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn month(self) -> YearMonth {
        // Day 1 exists in every month.
        YearMonth(self.0.with_day(1).unwrap_or(self.0))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateKey(pub String);

impl fmt::Display for InvalidDateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date key: {} (expected YYYY-MM-DD)", self.0)
    }
}

impl std::error::Error for InvalidDateKey {}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let well_formed = raw.len() == 10
            && raw.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(InvalidDateKey(raw.to_string()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidDateKey(raw.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A calendar month, held as its first day so it is always in chrono's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// Normalizes a 0-based month the way date arithmetic does, so `-1`
    /// is December of the previous year and `12` is January of the next.
    /// `None` when the result leaves the representable date range.
    pub fn from_zero_based(year: i32, month0: i32) -> Option<Self> {
        let total = year.checked_mul(12)?.checked_add(month0)?;
        let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
        Self::new(total.div_euclid(12), month)
    }

    pub fn offset(self, months: i32) -> Option<Self> {
        let month0 = (self.month() as i32 - 1).checked_add(months)?;
        Self::from_zero_based(self.year(), month0)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn prefix(self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    pub fn first_day(self) -> DateKey {
        DateKey(self.0)
    }

    pub fn days_in_month(self) -> u32 {
        let first = self.first_day().date();
        first
            .checked_add_months(Months::new(1))
            .map(|next| (next - first).num_days() as u32)
            .unwrap_or(31)
    }

    pub fn days(self) -> impl Iterator<Item = DateKey> {
        let first = self.first_day().date();
        first
            .iter_days()
            .take(self.days_in_month() as usize)
            .map(DateKey)
    }

    pub fn contains(self, date: DateKey) -> bool {
        date.month() == self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())
    }
}

/// Entry strings per date for one month; dates without entries are absent.
pub type MonthSnapshot = BTreeMap<DateKey, Vec<String>>;

/// Raw entry form input; every field is optional so missing values can be
/// reported as invalid entries instead of rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryRequest {
    pub center: Option<String>,
    pub name: Option<String>,
    pub duty_type: Option<String>,
    pub incident_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub offset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryView {
    pub raw: String,
    pub entry: Option<Entry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayView {
    pub date: DateKey,
    pub entries: Vec<EntryView>,
    pub counts: Tally,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(flatten)]
    pub day: DayView,
    pub persisted: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: DateKey,
    pub day: u32,
    pub entry_count: usize,
    pub counts: Tally,
    pub selected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub prefix: String,
    /// Sunday-first weeks; `None` marks a placeholder cell.
    pub weeks: Vec<Vec<Option<CalendarCell>>>,
    pub days: BTreeMap<DateKey, DayView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub month: MonthView,
    pub selected: Option<DayView>,
    pub backend: String,
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub centers: Vec<&'static str>,
    pub duty_types: Vec<&'static str>,
    pub incident_types: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> DateKey {
        raw.parse().unwrap()
    }

    #[test]
    fn date_key_is_strict() {
        assert_eq!(key("2024-03-05").to_string(), "2024-03-05");
        for raw in ["2024-3-5", "2024-02-30", "20240305", "2024-03-05T00", "abcd-ef-gh"] {
            assert!(raw.parse::<DateKey>().is_err(), "{raw}");
        }
    }

    #[test]
    fn date_keys_order_by_date() {
        assert!(key("2023-12-31") < key("2024-01-01"));
        assert!(key("2024-01-09") < key("2024-01-10"));
    }

    #[test]
    fn zero_based_month_normalizes() {
        let march = YearMonth::from_zero_based(2024, 2).unwrap();
        assert_eq!(march, YearMonth::new(2024, 3).unwrap());
        assert_eq!(march.prefix(), "2024-03");
        assert_eq!(
            YearMonth::from_zero_based(2024, -1),
            YearMonth::new(2023, 12)
        );
        assert_eq!(
            YearMonth::from_zero_based(2024, 12),
            YearMonth::new(2025, 1)
        );
    }

    #[test]
    fn offset_crosses_year_boundaries() {
        let january = YearMonth::new(2025, 1).unwrap();
        assert_eq!(january.offset(-1), YearMonth::new(2024, 12));
        assert_eq!(january.offset(13), YearMonth::new(2026, 2));
    }

    #[test]
    fn offset_outside_date_range_is_rejected() {
        let january = YearMonth::new(2024, 1).unwrap();
        assert_eq!(january.offset(i32::MAX), None);
        assert_eq!(january.offset(i32::MIN), None);
        assert_eq!(january.offset(10_000_000), None);
        assert_eq!(YearMonth::from_zero_based(i32::MAX, 0), None);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 12).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(2024, 4).unwrap().days().count(), 30);
        assert!(YearMonth::new(2024, 13).is_none());
    }

    #[test]
    fn contains_checks_year_and_month() {
        let march = YearMonth::new(2024, 3).unwrap();
        assert!(march.contains(key("2024-03-31")));
        assert!(!march.contains(key("2023-03-01")));
    }
}
