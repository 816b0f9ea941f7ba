use service::working_hours::{DayWindow, MinuteRange};

/// Candidate slots of a fixed duration on a fixed grid inside a day window.
///
/// The iterator is `Clone`, so a sequence can be replayed from any position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateSlots {
    next_start: i64,
    last_start: i64,
    duration: i64,
    granularity: i64,
}

impl CandidateSlots {
    pub fn new(window: &DayWindow, duration_minutes: u32, granularity_minutes: u32) -> Self {
        let duration = i64::from(duration_minutes);
        let granularity = i64::from(granularity_minutes);
        if !window.is_working_day || duration == 0 || granularity == 0 {
            return Self::empty();
        }
        Self {
            next_start: window.start,
            last_start: window.end - duration,
            duration,
            granularity,
        }
    }

    fn empty() -> Self {
        Self {
            next_start: 1,
            last_start: 0,
            duration: 0,
            granularity: 1,
        }
    }
}

impl Iterator for CandidateSlots {
    type Item = MinuteRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start > self.last_start {
            return None;
        }
        let slot = MinuteRange::new(self.next_start, self.next_start + self.duration);
        self.next_start += self.granularity;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next_start > self.last_start {
            0
        } else {
            ((self.last_start - self.next_start) / self.granularity + 1) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CandidateSlots {}
