use service::clock::ClockService;
use time::{OffsetDateTime, PrimitiveDateTime};
use time_tz::{timezones, OffsetDateTimeExt, Tz};

/// Clock reading the current time in a fixed timezone.
pub struct ClockServiceImpl {
    timezone: Option<&'static Tz>,
}

impl ClockServiceImpl {
    /// Unknown timezone names fall back to UTC.
    pub fn new(timezone: &str) -> Self {
        let timezone = timezones::get_by_name(timezone);
        if timezone.is_none() {
            tracing::warn!("Unknown timezone, using UTC for the current date");
        }
        Self { timezone }
    }

    fn now(&self) -> PrimitiveDateTime {
        let now = match self.timezone {
            Some(timezone) => OffsetDateTime::now_utc().to_timezone(timezone),
            None => OffsetDateTime::now_utc(),
        };
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

impl ClockService for ClockServiceImpl {
    fn time_now(&self) -> time::Time {
        self.now().time()
    }
    fn date_now(&self) -> time::Date {
        self.now().date()
    }
    fn date_time_now(&self) -> time::PrimitiveDateTime {
        self.now()
    }
}
