use agendum_utils::{minutes_relative_to, MINUTES_PER_DAY};
use service::{
    availability::{BlockReason, BlockedInterval, ConflictKind},
    booking::Booking,
    service_definition::Buffers,
    working_hours::{DayWindow, MinuteRange},
};
use time::Date;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BookedRange {
    booking_id: Uuid,
    range: MinuteRange,
}

/// A conflict found for a candidate, in minutes relative to the calendar's date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinuteConflict {
    pub range: MinuteRange,
    pub kind: ConflictKind,
    pub booking_id: Option<Uuid>,
}

/// Blocking bookings and breaks of one provider around one date.
///
/// Bookings are kept sorted by start so that scans for a candidate stop at the first
/// booking which starts too late to reach it. Checking all candidates of a day is
/// O(slots × bookings) in the worst case.
#[derive(Clone, Debug)]
pub struct BlockedCalendar {
    bookings: Vec<BookedRange>,
    breaks: Vec<MinuteRange>,
}

impl BlockedCalendar {
    pub fn new(date: Date, bookings: &[Booking], breaks: &[MinuteRange]) -> Self {
        let mut booked = bookings
            .iter()
            .filter(|booking| booking.status.blocks_calendar())
            .map(|booking| BookedRange {
                booking_id: booking.id,
                range: MinuteRange::new(
                    minutes_relative_to(date, booking.start_time),
                    minutes_relative_to(date, booking.end_time),
                ),
            })
            .filter(|booked| !booked.range.is_empty())
            .collect::<Vec<_>>();
        booked.sort_by_key(|booked| (booked.range, booked.booking_id));
        Self {
            bookings: booked,
            breaks: breaks.to_vec(),
        }
    }

    /// Bookings whose buffer-expanded interval could reach `candidate`.
    fn bookings_near<'a>(
        &'a self,
        candidate: &'a MinuteRange,
        buffers: &'a Buffers,
    ) -> impl Iterator<Item = &'a BookedRange> + 'a {
        self.bookings
            .iter()
            .take_while(move |booked| {
                booked.range.start - i64::from(buffers.before_minutes) < candidate.end
            })
    }

    /// `true` if the candidate touches neither a break nor the buffer-expanded
    /// interval of any booking.
    pub fn is_free(&self, candidate: &MinuteRange, buffers: &Buffers) -> bool {
        !self.breaks.iter().any(|brk| brk.overlaps(candidate))
            && !self.bookings_near(candidate, buffers).any(|booked| {
                booked
                    .range
                    .expand(buffers.before_minutes, buffers.after_minutes)
                    .overlaps(candidate)
            })
    }

    /// Raw booking intervals clipped to the day, followed by the breaks, in
    /// start/end/reason order. Bookings lying completely on other days are left out.
    pub fn blocked_intervals(&self) -> Vec<BlockedInterval> {
        let day = MinuteRange::new(0, MINUTES_PER_DAY);
        let mut blocked = self
            .bookings
            .iter()
            .map(|booked| booked.range.clamp_to(&day))
            .filter(|range| !range.is_empty())
            .map(|range| BlockedInterval {
                range,
                reason: BlockReason::ExistingBooking,
            })
            .chain(self.breaks.iter().map(|range| BlockedInterval {
                range: *range,
                reason: BlockReason::BreakTime,
            }))
            .collect::<Vec<_>>();
        blocked.sort();
        blocked
    }

    /// Every reason why `candidate` cannot be booked in `window`.
    ///
    /// A booking whose own interval overlaps the candidate is an overlap, one that only
    /// reaches it through the buffers is a buffer violation.
    pub fn classify(
        &self,
        candidate: &MinuteRange,
        buffers: &Buffers,
        window: &DayWindow,
    ) -> Vec<MinuteConflict> {
        let mut conflicts = Vec::new();
        if !window.span().contains(candidate) {
            conflicts.push(MinuteConflict {
                range: *candidate,
                kind: ConflictKind::OutsideWorkingHours,
                booking_id: None,
            });
        }
        conflicts.extend(
            self.breaks
                .iter()
                .filter(|brk| brk.overlaps(candidate))
                .map(|brk| MinuteConflict {
                    range: *brk,
                    kind: ConflictKind::BreakTime,
                    booking_id: None,
                }),
        );
        for booked in self.bookings_near(candidate, buffers) {
            let kind = if booked.range.overlaps(candidate) {
                ConflictKind::Overlap
            } else if booked
                .range
                .expand(buffers.before_minutes, buffers.after_minutes)
                .overlaps(candidate)
            {
                ConflictKind::BufferViolation
            } else {
                continue;
            };
            conflicts.push(MinuteConflict {
                range: booked.range,
                kind,
                booking_id: Some(booked.booking_id),
            });
        }
        conflicts.sort();
        conflicts
    }
}
