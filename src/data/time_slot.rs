//! Weekly meeting times parsed from lecture time text.

use chrono::{NaiveTime, Weekday};
use regex::Regex;
use std::sync::LazyLock;

/// One weekly meeting: day of week plus a start/end wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

static SLOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([월화수목금토일])\s*(\d{1,2}:\d{2})\s*[~\-]\s*(\d{1,2}:\d{2})").unwrap()
});

fn weekday_from_korean(day: &str) -> Option<Weekday> {
    match day {
        "월" => Some(Weekday::Mon),
        "화" => Some(Weekday::Tue),
        "수" => Some(Weekday::Wed),
        "목" => Some(Weekday::Thu),
        "금" => Some(Weekday::Fri),
        "토" => Some(Weekday::Sat),
        "일" => Some(Weekday::Sun),
        _ => None,
    }
}

impl TimeSlot {
    /// Every `<day> HH:MM ~ HH:MM` segment in `text`.
    ///
    /// Segments that do not parse, or whose end is not after their start,
    /// are skipped.
    ///
    /// ```
    /// use chrono::Weekday;
    /// use knu_courses::data::TimeSlot;
    ///
    /// let slots = TimeSlot::parse_all("월 09:00 ~ 10:15\n수 09:00-10:15");
    /// assert_eq!(slots.len(), 2);
    /// assert_eq!(slots[1].day, Weekday::Wed);
    /// ```
    pub fn parse_all(text: &str) -> Vec<Self> {
        SLOT_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let day = weekday_from_korean(&caps[1])?;
                let start = NaiveTime::parse_from_str(&caps[2], "%H:%M").ok()?;
                let end = NaiveTime::parse_from_str(&caps[3], "%H:%M").ok()?;
                (start < end).then_some(Self { day, start, end })
            })
            .collect()
    }

    /// Same day and the time ranges intersect. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}
