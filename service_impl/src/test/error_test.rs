use std::time::Duration;

use service::{
    availability::{ConflictKind, RejectionReason},
    ServiceError, ValidationFailureItem,
};
use uuid::Uuid;

pub fn test_not_found<T>(result: &Result<T, ServiceError>, target_id: &Uuid) {
    if let Err(ServiceError::EntityNotFound(id)) = result {
        assert_eq!(
            id, target_id,
            "Expected entity {} not found but got {}",
            target_id, id
        );
    } else {
        panic!("Expected entity {} not found error", target_id);
    }
}

pub fn test_validation_error<T>(
    result: &Result<T, ServiceError>,
    validation_failure: &ValidationFailureItem,
    fail_count: usize,
) {
    if let Err(ServiceError::ValidationError(validation_failure_items)) = result {
        if !validation_failure_items.contains(validation_failure) {
            panic!(
                "Validation failure not found: {:?} in {:?}",
                validation_failure, validation_failure_items
            );
        }
        assert_eq!(fail_count, validation_failure_items.len());
    } else {
        panic!("Expected validation error");
    }
}

pub fn test_booking_window_violation<T>(
    result: &Result<T, ServiceError>,
    expected_reason: RejectionReason,
) {
    if let Err(ServiceError::BookingWindowViolation(reason)) = result {
        assert_eq!(*reason, expected_reason);
    } else {
        panic!("Expected booking window violation {:?}", expected_reason);
    }
}

/// Asserts a booking conflict and returns the conflict kinds in reported order.
pub fn test_booking_conflict<T>(result: &Result<T, ServiceError>) -> Vec<ConflictKind> {
    if let Err(ServiceError::BookingConflict(conflicts)) = result {
        assert!(!conflicts.is_empty(), "Booking conflict without conflicts");
        conflicts.iter().map(|conflict| conflict.kind).collect()
    } else {
        panic!("Expected booking conflict error");
    }
}

pub fn test_not_bookable<T>(result: &Result<T, ServiceError>) -> Vec<ConflictKind> {
    if let Err(ServiceError::NotBookable(conflicts)) = result {
        assert!(!conflicts.is_empty(), "Not bookable without conflicts");
        conflicts.iter().map(|conflict| conflict.kind).collect()
    } else {
        panic!("Expected not bookable error");
    }
}

pub fn test_commit_lock_timeout<T>(result: &Result<T, ServiceError>) {
    if let Err(ServiceError::CommitLockTimeout(_)) = result {
    } else {
        panic!("Expected commit lock timeout");
    }
}

pub fn test_store_timeout<T>(result: &Result<T, ServiceError>, expected_timeout: Duration) {
    if let Err(ServiceError::StoreTimeout(timeout)) = result {
        assert_eq!(*timeout, expected_timeout);
    } else {
        panic!("Expected store timeout");
    }
}
