#[cfg(feature = "service-impl")]
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "service-impl")]
use agendum_utils::{format_hh_mm, format_iso_date, format_time};
#[cfg(feature = "service-impl")]
use service::{
    availability::{AvailabilityResult, BlockedInterval, Conflict, SuggestedSlot, TimeSlot},
    booking::{Booking, BookingRequest, BookingStatus},
    working_hours::{DayWindow, MinuteRange},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotTO {
    #[schema(example = "09:00")]
    pub start_time: String,
    #[schema(example = "09:30")]
    pub end_time: String,
    pub is_available: bool,
}
#[cfg(feature = "service-impl")]
impl From<&TimeSlot> for TimeSlotTO {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            start_time: format_hh_mm(slot.range.start),
            end_time: format_hh_mm(slot.range.end),
            is_available: slot.is_available,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakTO {
    pub start: String,
    pub end: String,
}
#[cfg(feature = "service-impl")]
impl From<&MinuteRange> for BreakTO {
    fn from(range: &MinuteRange) -> Self {
        Self {
            start: format_hh_mm(range.start),
            end: format_hh_mm(range.end),
        }
    }
}

/// Resolved operating window. Closed days report `00:00` to `00:00`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHoursTO {
    pub start: String,
    pub end: String,
    pub is_working_day: bool,
    #[serde(default)]
    pub breaks: Vec<BreakTO>,
}
#[cfg(feature = "service-impl")]
impl From<&DayWindow> for WorkingHoursTO {
    fn from(window: &DayWindow) -> Self {
        Self {
            start: format_hh_mm(window.start),
            end: format_hh_mm(window.end),
            is_working_day: window.is_working_day,
            breaks: window.breaks.iter().map(BreakTO::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlotTO {
    pub start_time: String,
    pub end_time: String,
    #[schema(example = "Existing booking")]
    pub reason: String,
}
#[cfg(feature = "service-impl")]
impl From<&BlockedInterval> for BlockedSlotTO {
    fn from(blocked: &BlockedInterval) -> Self {
        Self {
            start_time: format_hh_mm(blocked.range.start),
            end_time: format_hh_mm(blocked.range.end),
            reason: blocked.reason.label().into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityTO {
    pub service_id: Uuid,
    #[schema(example = "2026-10-20")]
    pub date: String,
    pub duration_minutes: u32,
    /// `OPEN`, `CLOSED_DAY` or `POLICY_REJECTED`.
    pub status: String,
    #[serde(default)]
    pub reason_code: Option<String>,
    pub available_slots: Vec<TimeSlotTO>,
    pub working_hours: WorkingHoursTO,
    pub blocked_slots: Vec<BlockedSlotTO>,
}
#[cfg(feature = "service-impl")]
impl From<&AvailabilityResult> for AvailabilityTO {
    fn from(result: &AvailabilityResult) -> Self {
        Self {
            service_id: result.service_id,
            date: format_iso_date(result.date),
            duration_minutes: result.duration_minutes,
            status: result.status.code().into(),
            reason_code: result.status.reason_code().map(String::from),
            available_slots: result.slots.iter().map(TimeSlotTO::from).collect(),
            working_hours: (&result.working_hours).into(),
            blocked_slots: result.blocked.iter().map(BlockedSlotTO::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedSlotTO {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}
#[cfg(feature = "service-impl")]
impl From<&SuggestedSlot> for SuggestedSlotTO {
    fn from(slot: &SuggestedSlot) -> Self {
        Self {
            date: format_iso_date(slot.date),
            start_time: format_time(slot.start_time.time()),
            end_time: format_time(slot.end_time.time()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatusTO {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}
#[cfg(feature = "service-impl")]
impl From<&BookingStatus> for BookingStatusTO {
    fn from(status: &BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Confirmed => Self::Confirmed,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Completed => Self::Completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestTO {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: PrimitiveDateTime,
    /// Overrides the duration of the service.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}
#[cfg(feature = "service-impl")]
impl From<&BookingRequestTO> for BookingRequest {
    fn from(request: &BookingRequestTO) -> Self {
        Self {
            service_id: request.service_id,
            client_id: request.client_id,
            start_time: request.start_time,
            duration_minutes: request.duration_minutes,
            notes: request.notes.as_deref().map(Arc::from),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingTO {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: BookingStatusTO,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created: Option<PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
#[cfg(feature = "service-impl")]
impl From<&Booking> for BookingTO {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            provider_id: booking.provider_id,
            service_id: booking.service_id,
            client_id: booking.client_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: (&booking.status).into(),
            notes: booking.notes.as_deref().map(String::from),
            created: booking.created,
            version: booking.version,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictTO {
    #[schema(example = "OVERLAP")]
    pub kind: String,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    #[serde(default)]
    pub booking_id: Option<Uuid>,
}
#[cfg(feature = "service-impl")]
impl From<&Conflict> for ConflictTO {
    fn from(conflict: &Conflict) -> Self {
        Self {
            kind: conflict.kind.code().into(),
            start_time: conflict.start_time,
            end_time: conflict.end_time,
            booking_id: conflict.booking_id,
        }
    }
}

/// Body of rejected booking commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitRejectionTO {
    #[schema(example = "BOOKING_CONFLICT")]
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(default)]
    pub conflicts: Vec<ConflictTO>,
}
