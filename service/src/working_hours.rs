use std::sync::Arc;

use agendum_utils::{minutes_since_midnight, DayOfWeek};
use dao::working_hours::{WorkingHoursBreakEntity, WorkingHoursEntity};

use crate::ServiceError;

/// Half-open interval `[start, end)` in minutes relative to midnight of some date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinuteRange {
    pub start: i64,
    pub end: i64,
}

impl MinuteRange {
    pub const EMPTY: MinuteRange = MinuteRange { start: 0, end: 0 };

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &MinuteRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, other: &MinuteRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn expand(&self, before_minutes: u32, after_minutes: u32) -> Self {
        Self {
            start: self.start - i64::from(before_minutes),
            end: self.end + i64::from(after_minutes),
        }
    }

    pub fn clamp_to(&self, bounds: &MinuteRange) -> Self {
        Self {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

/// Operating window of a provider on one date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
    pub is_working_day: bool,
    pub breaks: Arc<[MinuteRange]>,
}

impl DayWindow {
    pub fn closed() -> Self {
        Self {
            start: 0,
            end: 0,
            is_working_day: false,
            breaks: Arc::new([]),
        }
    }

    pub fn span(&self) -> MinuteRange {
        if self.is_working_day {
            MinuteRange::new(self.start, self.end)
        } else {
            MinuteRange::EMPTY
        }
    }
}

/// A provider's schedule with one optional window per weekday.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [Option<DayWindow>; 7],
}

impl WeeklySchedule {
    pub fn day(&self, day_of_week: DayOfWeek) -> Option<&DayWindow> {
        self.days[day_of_week.index() as usize].as_ref()
    }

    pub fn set_day(&mut self, day_of_week: DayOfWeek, window: DayWindow) {
        self.days[day_of_week.index() as usize] = Some(window);
    }

    /// Builds the schedule from stored rows.
    ///
    /// A working day must end after it starts and every break must be a non-empty
    /// interval inside its day's window. Breaks on days without a working-hours row
    /// cannot be placed anywhere and are ignored.
    pub fn from_entities(
        hours: &[WorkingHoursEntity],
        breaks: &[WorkingHoursBreakEntity],
    ) -> Result<Self, ServiceError> {
        let mut schedule = WeeklySchedule::default();
        for entity in hours {
            let start = minutes_since_midnight(entity.start);
            let end = minutes_since_midnight(entity.end);
            if entity.is_working_day && end <= start {
                return Err(ServiceError::InvalidWorkingHours(entity.day_of_week));
            }
            let span = MinuteRange::new(start, end);
            let mut day_breaks = breaks
                .iter()
                .filter(|brk| brk.day_of_week == entity.day_of_week)
                .map(|brk| {
                    MinuteRange::new(
                        minutes_since_midnight(brk.start),
                        minutes_since_midnight(brk.end),
                    )
                })
                .collect::<Vec<_>>();
            if entity.is_working_day
                && day_breaks
                    .iter()
                    .any(|brk| brk.is_empty() || !span.contains(brk))
            {
                return Err(ServiceError::InvalidWorkingHours(entity.day_of_week));
            }
            day_breaks.sort();
            schedule.set_day(
                entity.day_of_week,
                DayWindow {
                    start,
                    end,
                    is_working_day: entity.is_working_day,
                    breaks: day_breaks.into(),
                },
            );
        }
        Ok(schedule)
    }
}
