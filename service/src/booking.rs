use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use dao::booking::{BookingEntity, BookingStatusEntity};
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Only pending and confirmed bookings occupy the provider's calendar.
    pub fn blocks_calendar(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl From<&BookingStatusEntity> for BookingStatus {
    fn from(status: &BookingStatusEntity) -> Self {
        match status {
            BookingStatusEntity::Pending => Self::Pending,
            BookingStatusEntity::Confirmed => Self::Confirmed,
            BookingStatusEntity::Cancelled => Self::Cancelled,
            BookingStatusEntity::Completed => Self::Completed,
        }
    }
}

impl From<&BookingStatus> for BookingStatusEntity {
    fn from(status: &BookingStatus) -> Self {
        match status {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Confirmed => Self::Confirmed,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: BookingStatus,
    pub notes: Option<Arc<str>>,
    pub created: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&BookingEntity> for Booking {
    fn from(booking: &BookingEntity) -> Self {
        Self {
            id: booking.id,
            provider_id: booking.provider_id,
            service_id: booking.service_id,
            client_id: booking.client_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: (&booking.status).into(),
            notes: booking.notes.clone(),
            created: Some(booking.created),
            version: booking.version,
        }
    }
}

impl TryFrom<&Booking> for BookingEntity {
    type Error = ServiceError;
    fn try_from(booking: &Booking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: booking.id,
            provider_id: booking.provider_id,
            service_id: booking.service_id,
            client_id: booking.client_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: (&booking.status).into(),
            notes: booking.notes.clone(),
            created: booking.created.ok_or(ServiceError::InternalError)?,
            deleted: None,
            version: booking.version,
        })
    }
}

/// A client's request to book a service starting at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: PrimitiveDateTime,
    /// Overrides the service duration when set.
    pub duration_minutes: Option<u32>,
    pub notes: Option<Arc<str>>,
}

/// Lifecycle of a booking commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPhase {
    Requested,
    Validating,
    Committed,
    Rejected,
}

impl Display for CommitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommitPhase::Requested => "REQUESTED",
            CommitPhase::Validating => "VALIDATING",
            CommitPhase::Committed => "COMMITTED",
            CommitPhase::Rejected => "REJECTED",
        })
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait BookingCommitService {
    type Transaction: dao::Transaction;

    /// Stores a new pending booking unless it collides with the provider's calendar.
    ///
    /// Commits for the same provider and date are serialized, and the conflict check
    /// runs in the same transaction as the insert.
    async fn commit(&self, request: &BookingRequest) -> Result<Booking, ServiceError>;

    async fn get(&self, id: Uuid, tx: Option<Self::Transaction>) -> Result<Booking, ServiceError>;
}
