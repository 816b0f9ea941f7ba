use std::fmt::{Display, Formatter};
use std::sync::Arc;

use thiserror::*;
use time::{macros::format_description, Date, Duration, PrimitiveDateTime, Time, Weekday};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Error)]
pub enum AgendumDateUtilsError {
    #[error("Invalid date: {0}")]
    DateError(#[from] time::error::ComponentRange),

    #[error("Could not parse {0:?}: {1}")]
    ParseError(Arc<str>, time::error::Parse),

    #[error("Invalid day of week index: {0}")]
    InvalidDayIndex(u8),
}

/// Day of the week, indexed from Sunday (0) to Saturday (6).
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sunday => Self::Sunday,
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
        }
    }
}
impl From<DayOfWeek> for Weekday {
    fn from(day_of_week: DayOfWeek) -> Self {
        match day_of_week {
            DayOfWeek::Sunday => Self::Sunday,
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DayOfWeek::Sunday => "Sunday",
                DayOfWeek::Monday => "Monday",
                DayOfWeek::Tuesday => "Tuesday",
                DayOfWeek::Wednesday => "Wednesday",
                DayOfWeek::Thursday => "Thursday",
                DayOfWeek::Friday => "Friday",
                DayOfWeek::Saturday => "Saturday",
            }
        )
    }
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn index(&self) -> u8 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }

    pub fn from_index(index: u8) -> Result<Self, AgendumDateUtilsError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(AgendumDateUtilsError::InvalidDayIndex(index))
    }

    pub fn of_date(date: Date) -> Self {
        date.weekday().into()
    }
}

pub fn minutes_since_midnight(time: Time) -> i64 {
    time.hour() as i64 * 60 + time.minute() as i64
}

/// Minutes between midnight of `date` and `datetime`. Negative for instants on earlier
/// days and greater than [`MINUTES_PER_DAY`] for instants on later days.
pub fn minutes_relative_to(date: Date, datetime: PrimitiveDateTime) -> i64 {
    (datetime - date.midnight()).whole_minutes()
}

pub fn datetime_at_minute(date: Date, minutes: i64) -> PrimitiveDateTime {
    date.midnight().saturating_add(Duration::minutes(minutes))
}

/// Wall-clock label for a minute offset. Offsets are clamped to the day, so the end of
/// the day renders as `24:00`.
pub fn format_hh_mm(minutes: i64) -> String {
    let minutes = minutes.clamp(0, MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn format_time(time: Time) -> String {
    format_hh_mm(minutes_since_midnight(time))
}

pub fn parse_hh_mm(value: &str) -> Result<Time, AgendumDateUtilsError> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|err| AgendumDateUtilsError::ParseError(value.into(), err))
}

pub fn parse_iso_date(value: &str) -> Result<Date, AgendumDateUtilsError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|err| AgendumDateUtilsError::ParseError(value.into(), err))
}

pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// All dates from `first` to `last`, both inclusive. Empty if `last < first`.
pub fn dates_between(first: Date, last: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    let mut current = Some(first);
    while let Some(date) = current {
        if date > last {
            break;
        }
        dates.push(date);
        current = date.next_day();
    }
    dates
}
