use crate::codec::{Entry, parse};
use crate::timerange::{Block, DAY_BLOCK, NIGHT_BLOCK, overlaps};
use crate::vocab::DutyType;
use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCounts {
    pub regular: u32,
    pub overtime: u32,
}

/// Per-date staffing tally on the day and night axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub day: ShiftCounts,
    pub night: ShiftCounts,
}

/// Unparsable strings are skipped. One entry may count on both axes.
pub fn aggregate<S: AsRef<str>>(entries: &[S]) -> Tally {
    let mut tally = Tally::default();
    for entry in entries.iter().filter_map(|raw| parse(raw.as_ref())) {
        let overtime = entry.incident_type.is_overtime();
        if affects(&entry, Axis::Day) {
            bump(&mut tally.day, overtime);
        }
        if affects(&entry, Axis::Night) {
            bump(&mut tally.night, overtime);
        }
    }
    tally
}

#[derive(Clone, Copy)]
enum Axis {
    Day,
    Night,
}

impl Axis {
    fn block(self) -> Block {
        match self {
            Axis::Day => DAY_BLOCK,
            Axis::Night => NIGHT_BLOCK,
        }
    }
}

fn affects(entry: &Entry, axis: Axis) -> bool {
    match (entry.duty_type, axis) {
        (DutyType::Day, Axis::Day) | (DutyType::Night, Axis::Night) => true,
        (DutyType::Day, Axis::Night) | (DutyType::Night, Axis::Day) => false,
        (DutyType::OnCall, _) => true,
        (DutyType::Other, axis) => entry
            .time_range
            .is_some_and(|range| overlaps(range.span(), axis.block())),
    }
}

fn bump(counts: &mut ShiftCounts, overtime: bool) {
    if overtime {
        counts.overtime = counts.overtime.saturating_add(1);
    } else {
        counts.regular = counts.regular.saturating_add(1);
    }
}

/// Stable sort by person name; raw strings are compared when either side
/// does not parse.
pub fn sort_entries(entries: &mut [String]) {
    entries.sort_by(|a, b| match (parse(a), parse(b)) {
        (Some(left), Some(right)) => collate(&left.name, &right.name),
        _ => collate(a, b),
    });
}

thread_local! {
    static KOREAN: Option<Collator> =
        Collator::try_new(&locale!("ko").into(), CollatorOptions::new())
            .map_err(|err| warn!("korean collation unavailable: {err}"))
            .ok();
}

/// Korean locale collation. Falls back to case-folded code-point order,
/// lowercase first on ties, if the collation data cannot be loaded.
pub fn collate(a: &str, b: &str) -> Ordering {
    KOREAN.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => folded_order(a, b),
    })
}

fn folded_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
