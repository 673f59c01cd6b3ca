//! Canonical entry strings.
//!
//! One entry encodes as `[<center>]<name>(<duty>-<incident>[;HH:MM~HH:MM])`
//! and a day's entries are stored joined by `,` without escaping. This is the
//! persisted wire format, so encoding must stay byte-exact.

use crate::errors::InvalidEntry;
use crate::models::{EntryRequest, EntryView};
use crate::timerange::{ClockTime, TimeRange};
use crate::vocab::{Center, DutyType, IncidentType};
use serde::{Deserialize, Serialize};

pub const ENTRY_DELIMITER: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub center: Center,
    pub name: String,
    pub duty_type: DutyType,
    pub incident_type: IncidentType,
    /// Present only for time-based (`기타`) duty.
    pub time_range: Option<TimeRange>,
}

/// Decodes one entry string, or `None` if it does not match the grammar.
///
/// Clock times must be real `HH:MM` values and names must hold more than
/// whitespace. Stored strings such as `25:00~02:00` or a blank name are
/// still listed raw but are left out of tallies.
pub fn parse(raw: &str) -> Option<Entry> {
    let rest = raw.strip_prefix('[')?;
    let (center, rest) = rest.split_once(']')?;
    let center = Center::from_label(center)?;

    // The duty/incident group never contains '(' so it starts at the last one.
    let body = rest.strip_suffix(')')?;
    let open = body.rfind('(')?;
    let name = &body[..open];
    let group = &body[open + 1..];
    if name.is_empty() || name.chars().any(is_line_terminator) {
        return None;
    }

    let (kinds, time) = match group.split_once(';') {
        Some((kinds, time)) => (kinds, Some(time)),
        None => (group, None),
    };
    let (duty, incident) = kinds.split_once('-')?;
    let duty_type = DutyType::from_label(duty)?;
    let incident_type = IncidentType::from_label(incident)?;
    let time_range = match time {
        Some(time) => Some(TimeRange::parse(time)?),
        None => None,
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(Entry {
        center,
        name: name.to_string(),
        duty_type,
        incident_type,
        time_range,
    })
}

/// Encodes an entry. The result is guaranteed to parse back to the same entry.
pub fn format(entry: &Entry) -> Result<String, InvalidEntry> {
    let name = entry.name.trim();
    if name.is_empty() {
        return Err(InvalidEntry::MissingField("name"));
    }
    if name.contains(ENTRY_DELIMITER) {
        return Err(InvalidEntry::DelimiterInName(ENTRY_DELIMITER));
    }
    match (entry.duty_type.is_time_based(), entry.time_range) {
        (true, None) => {
            return Err(InvalidEntry::MissingTimeRange(entry.duty_type.to_string()));
        }
        (false, Some(_)) => {
            return Err(InvalidEntry::UnexpectedTimeRange(
                entry.duty_type.to_string(),
            ));
        }
        _ => {}
    }

    let mut encoded = format!(
        "[{}]{}({}-{}",
        entry.center, name, entry.duty_type, entry.incident_type
    );
    if let Some(range) = entry.time_range {
        encoded.push(';');
        encoded.push_str(&range.to_string());
    }
    encoded.push(')');

    if parse(&encoded).is_none() {
        return Err(InvalidEntry::Unparsable(encoded));
    }
    Ok(encoded)
}

/// Validates raw form input into an entry.
pub fn build_entry(request: &EntryRequest) -> Result<Entry, InvalidEntry> {
    let center = required(request.center.as_deref(), "center")?;
    let center = Center::from_label(center).ok_or_else(|| unknown("center", center))?;
    let name = required(request.name.as_deref(), "name")?;
    let duty = required(request.duty_type.as_deref(), "duty_type")?;
    let duty_type = DutyType::from_label(duty).ok_or_else(|| unknown("duty_type", duty))?;
    let incident = required(request.incident_type.as_deref(), "incident_type")?;
    let incident_type =
        IncidentType::from_label(incident).ok_or_else(|| unknown("incident_type", incident))?;

    let time_range = if duty_type.is_time_based() {
        let start = required(request.start_time.as_deref(), "start_time")?;
        let end = required(request.end_time.as_deref(), "end_time")?;
        Some(TimeRange::new(clock(start)?, clock(end)?))
    } else {
        None
    };

    Ok(Entry {
        center,
        name: name.to_string(),
        duty_type,
        incident_type,
        time_range,
    })
}

pub fn split_entries(content: &str) -> Vec<String> {
    content
        .split(ENTRY_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_entries(entries: &[String]) -> String {
    entries.join(ENTRY_DELIMITER.to_string().as_str())
}

/// Unparsable strings are still listed, without structured fields.
pub fn describe_entry(raw: &str) -> EntryView {
    EntryView {
        raw: raw.to_string(),
        entry: parse(raw),
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, InvalidEntry> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(InvalidEntry::MissingField(field)),
    }
}

fn unknown(field: &'static str, value: &str) -> InvalidEntry {
    InvalidEntry::UnknownValue {
        field,
        value: value.to_string(),
    }
}

fn clock(raw: &str) -> Result<ClockTime, InvalidEntry> {
    ClockTime::parse(raw).ok_or_else(|| InvalidEntry::InvalidTime(raw.to_string()))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
