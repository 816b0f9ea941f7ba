use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::service_definition::Buffers;
use crate::working_hours::{DayWindow, MinuteRange};
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    pub range: MinuteRange,
    pub is_available: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockReason {
    ExistingBooking,
    BreakTime,
}

impl BlockReason {
    pub fn label(&self) -> &'static str {
        match self {
            BlockReason::ExistingBooking => "Existing booking",
            BlockReason::BreakTime => "Break time",
        }
    }
}

/// Ordered by start, then end, then reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockedInterval {
    pub range: MinuteRange,
    pub reason: BlockReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    PastDate,
    SameDayNotAllowed,
    BeyondAdvanceWindow { max_advance_booking_days: u32 },
    StartInPast,
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::PastDate => "PAST_DATE",
            RejectionReason::SameDayNotAllowed => "SAME_DAY_NOT_ALLOWED",
            RejectionReason::BeyondAdvanceWindow { .. } => "BEYOND_MAX_ADVANCE",
            RejectionReason::StartInPast => "START_IN_PAST",
        }
    }
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::PastDate => write!(f, "date lies in the past"),
            RejectionReason::SameDayNotAllowed => {
                write!(f, "same day booking is not allowed for this service")
            }
            RejectionReason::BeyondAdvanceWindow {
                max_advance_booking_days,
            } => write!(
                f,
                "date lies more than {} days ahead",
                max_advance_booking_days
            ),
            RejectionReason::StartInPast => write!(f, "start time lies in the past"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailabilityStatus {
    Open,
    ClosedDay,
    PolicyRejected(RejectionReason),
}

impl AvailabilityStatus {
    pub fn code(&self) -> &'static str {
        match self {
            AvailabilityStatus::Open => "OPEN",
            AvailabilityStatus::ClosedDay => "CLOSED_DAY",
            AvailabilityStatus::PolicyRejected(_) => "POLICY_REJECTED",
        }
    }

    pub fn reason_code(&self) -> Option<&'static str> {
        match self {
            AvailabilityStatus::PolicyRejected(reason) => Some(reason.code()),
            _ => None,
        }
    }
}

/// Availability of one service on one date. All minute values are relative to
/// midnight of `date`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailabilityResult {
    pub service_id: Uuid,
    pub date: Date,
    pub duration_minutes: u32,
    pub status: AvailabilityStatus,
    pub slots: Arc<[TimeSlot]>,
    pub working_hours: DayWindow,
    pub blocked: Arc<[BlockedInterval]>,
}

impl AvailabilityResult {
    pub fn available_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|slot| slot.is_available)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictKind {
    Overlap,
    BufferViolation,
    OutsideWorkingHours,
    BreakTime,
}

impl ConflictKind {
    pub fn code(&self) -> &'static str {
        match self {
            ConflictKind::Overlap => "OVERLAP",
            ConflictKind::BufferViolation => "BUFFER_VIOLATION",
            ConflictKind::OutsideWorkingHours => "OUTSIDE_WORKING_HOURS",
            ConflictKind::BreakTime => "BREAK_TIME",
        }
    }

    /// Conflicts caused by other bookings. These may disappear when bookings are
    /// cancelled, the others are properties of the schedule.
    pub fn is_booking_conflict(&self) -> bool {
        matches!(self, ConflictKind::Overlap | ConflictKind::BufferViolation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub booking_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictVerdict {
    Clear,
    Conflicting(Arc<[Conflict]>),
}

impl ConflictVerdict {
    pub fn is_clear(&self) -> bool {
        matches!(self, ConflictVerdict::Clear)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedSlot {
    pub date: Date,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait AvailabilityService {
    type Transaction: dao::Transaction;

    /// Candidate slots of the service on `date`. Policy rejections and closed days are
    /// reported through [`AvailabilityStatus`], never as errors.
    async fn get_availability(
        &self,
        service_id: Uuid,
        date: Date,
        duration_minutes: Option<u32>,
        tx: Option<Self::Transaction>,
    ) -> Result<AvailabilityResult, ServiceError>;

    /// Available slots on the days following `from` (inclusive).
    async fn suggest_slots(
        &self,
        service_id: Uuid,
        from: Date,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[SuggestedSlot]>, ServiceError>;

    /// Checks `[start_time, end_time)` against the provider's calendar as it is
    /// visible in `tx`.
    async fn compute_conflict(
        &self,
        provider_id: Uuid,
        start_time: PrimitiveDateTime,
        end_time: PrimitiveDateTime,
        buffers: Buffers,
        tx: Option<Self::Transaction>,
    ) -> Result<ConflictVerdict, ServiceError>;
}
