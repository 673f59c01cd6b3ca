use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// 09:00 to 18:00 on the range's start day.
pub const DAY_BLOCK: Block = Block {
    start: 9 * 60,
    end: 18 * 60,
};

/// 18:00 to 09:00 the following day.
pub const NIGHT_BLOCK: Block = Block {
    start: 18 * 60,
    end: (24 + 9) * 60,
};

const RANGE_SEPARATOR: char = '~';

/// A wall-clock time, stored as minutes after midnight in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Parses strict `HH:MM` (two ASCII digits on each side).
    pub fn parse(raw: &str) -> Option<Self> {
        let (hour, minute) = raw.split_once(':')?;
        Self::from_hm(two_digits(hour)?, two_digits(minute)?)
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

fn two_digits(raw: &str) -> Option<u32> {
    let bytes = raw.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0'))
}

/// Minutes after midnight for an `HH:MM` string, or `None` when malformed.
pub fn to_minutes(raw: &str) -> Option<u32> {
    ClockTime::parse(raw).map(ClockTime::minutes)
}

/// The `HH:MM~HH:MM` time range carried by an entry, as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (start, end) = raw.split_once(RANGE_SEPARATOR)?;
        Some(Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?))
    }

    /// Normalized interval; an end at or before the start wraps past midnight.
    pub fn span(self) -> MinuteSpan {
        let start = self.start.minutes();
        let mut end = self.end.minutes();
        if end <= start {
            end += MINUTES_PER_DAY;
        }
        MinuteSpan { start, end }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, RANGE_SEPARATOR, self.end)
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeRange::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time range: {raw}")))
    }
}

/// Half-open minute interval with `end` in `(start, start + 1440]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteSpan {
    pub start: u32,
    pub end: u32,
}

/// Splits on `~` and normalizes; `None` if either side is malformed.
pub fn parse_time_range(raw: &str) -> Option<MinuteSpan> {
    TimeRange::parse(raw).map(TimeRange::span)
}

/// Fixed reference window in minutes from midnight of the range's start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: u32,
    pub end: u32,
}

/// True if the span, or its copy shifted back one day, intersects the block.
pub fn overlaps(span: MinuteSpan, block: Block) -> bool {
    let start = i64::from(span.start);
    let end = i64::from(span.end);
    let day = i64::from(MINUTES_PER_DAY);
    intersects(start, end, block) || intersects(start - day, end - day, block)
}

fn intersects(start: i64, end: i64, block: Block) -> bool {
    start < i64::from(block.end) && end > i64::from(block.start)
}
