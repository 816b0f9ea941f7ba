use agendum_utils::DayOfWeek;
use service::working_hours::{DayWindow, WeeklySchedule};
use time::Date;

/// Operating window of a provider on `date`.
///
/// Missing schedules, missing weekday entries and non-working days all resolve to
/// the closed window.
pub fn resolve_day_window(schedule: Option<&WeeklySchedule>, date: Date) -> DayWindow {
    schedule
        .and_then(|schedule| schedule.day(DayOfWeek::of_date(date)))
        .filter(|window| window.is_working_day)
        .cloned()
        .unwrap_or_else(DayWindow::closed)
}
