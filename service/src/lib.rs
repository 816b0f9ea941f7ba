use std::sync::Arc;
use std::time::Duration;

use agendum_utils::DayOfWeek;
use availability::{Conflict, RejectionReason};
use thiserror::Error;
use uuid::Uuid;

pub mod availability;
pub mod booking;
pub mod clock;
pub mod config;
pub mod service_definition;
pub mod uuid_service;
pub mod working_hours;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("Invalid working hours configured for {0}")]
    InvalidWorkingHours(DayOfWeek),

    #[error("Booking window violation: {0}")]
    BookingWindowViolation(RejectionReason),

    #[error("Requested time is not bookable: {0:?}")]
    NotBookable(Arc<[Conflict]>),

    #[error("Requested time conflicts with existing bookings: {0:?}")]
    BookingConflict(Arc<[Conflict]>),

    #[error("Store did not answer within {0:?}")]
    StoreTimeout(Duration),

    #[error("Commit lock not acquired within {0:?}")]
    CommitLockTimeout(Duration),

    #[error("Time component out of range: {0}")]
    TimeComponentRange(#[from] time::error::ComponentRange),

    #[error("Internal error")]
    InternalError,
}

impl ServiceError {
    /// Errors after which the caller may simply try again, possibly after
    /// fetching fresh availability.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::StoreTimeout(_)
                | ServiceError::CommitLockTimeout(_)
                | ServiceError::BookingConflict(_)
        )
    }
}
