use crate::aggregate::aggregate;
use crate::codec::describe_entry;
use crate::models::{CalendarCell, DateKey, DayView, MonthSnapshot, MonthView, YearMonth};
use chrono::Datelike;

const DAYS_PER_WEEK: usize = 7;

pub fn day_view(date: DateKey, entries: &[String]) -> DayView {
    DayView {
        date,
        entries: entries.iter().map(|raw| describe_entry(raw)).collect(),
        counts: aggregate(entries),
    }
}

pub fn month_view(month: YearMonth, snapshot: &MonthSnapshot, selected: Option<DateKey>) -> MonthView {
    let days = snapshot
        .iter()
        .filter(|(date, _)| month.contains(**date))
        .map(|(date, entries)| (*date, day_view(*date, entries)))
        .collect();

    MonthView {
        year: month.year(),
        month: month.month(),
        prefix: month.prefix(),
        weeks: month_grid(month, snapshot, selected),
        days,
    }
}

/// Sunday-first week rows, padded with placeholders at both ends.
pub fn month_grid(
    month: YearMonth,
    snapshot: &MonthSnapshot,
    selected: Option<DateKey>,
) -> Vec<Vec<Option<CalendarCell>>> {
    let leading = month.first_day().date().weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<CalendarCell>> = (0..leading).map(|_| None).collect();

    for date in month.days() {
        let entries = snapshot.get(&date).map(Vec::as_slice).unwrap_or_default();
        cells.push(Some(CalendarCell {
            date,
            day: date.date().day(),
            entry_count: entries.len(),
            counts: aggregate(entries),
            selected: selected == Some(date),
        }));
    }

    let remainder = cells.len() % DAYS_PER_WEEK;
    if remainder != 0 {
        cells.extend((remainder..DAYS_PER_WEEK).map(|_| None));
    }

    let mut weeks = Vec::with_capacity(cells.len() / DAYS_PER_WEEK);
    let mut cells = cells.into_iter();
    loop {
        let week: Vec<_> = cells.by_ref().take(DAYS_PER_WEEK).collect();
        if week.is_empty() {
            break;
        }
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> DateKey {
        raw.parse().unwrap()
    }

    #[test]
    fn grid_pads_to_whole_weeks() {
        // March 2024 starts on a Friday and has 31 days.
        let month = YearMonth::new(2024, 3).unwrap();
        let weeks = month_grid(month, &MonthSnapshot::new(), None);
        assert_eq!(weeks.len(), 6);
        assert!(weeks.iter().all(|week| week.len() == 7));
        assert!(weeks[0][..5].iter().all(Option::is_none));
        assert_eq!(weeks[0][5].as_ref().unwrap().day, 1);
        assert_eq!(weeks[5][0].as_ref().unwrap().day, 31);
        assert!(weeks[5][1..].iter().all(Option::is_none));
    }

    #[test]
    fn grid_without_padding() {
        // February 2015 starts on a Sunday and fills exactly four weeks.
        let month = YearMonth::new(2015, 2).unwrap();
        let weeks = month_grid(month, &MonthSnapshot::new(), None);
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().flatten().all(Option::is_some));
    }

    #[test]
    fn cells_carry_tallies_and_selection() {
        let month = YearMonth::new(2024, 3).unwrap();
        let mut snapshot = MonthSnapshot::new();
        snapshot.insert(
            key("2024-03-01"),
            vec!["[서교]A(당번-연가)".to_string(), "메모".to_string()],
        );
        let weeks = month_grid(month, &snapshot, Some(key("2024-03-01")));
        let cell = weeks[0][5].as_ref().unwrap();
        assert!(cell.selected);
        assert_eq!(cell.entry_count, 2);
        assert_eq!(cell.counts.day.regular, 1);
        assert_eq!(cell.counts.night.regular, 1);
        let other = weeks[0][6].as_ref().unwrap();
        assert!(!other.selected);
        assert_eq!(other.entry_count, 0);
    }

    #[test]
    fn month_view_lists_only_dates_in_month() {
        let month = YearMonth::new(2024, 3).unwrap();
        let mut snapshot = MonthSnapshot::new();
        snapshot.insert(key("2024-03-10"), vec!["[서교]A(주간-연가)".to_string()]);
        snapshot.insert(key("2024-04-01"), vec!["[서교]B(주간-연가)".to_string()]);
        let view = month_view(month, &snapshot, None);
        assert_eq!(view.prefix, "2024-03");
        assert_eq!(view.days.len(), 1);
        assert!(view.days.contains_key(&key("2024-03-10")));
    }
}
