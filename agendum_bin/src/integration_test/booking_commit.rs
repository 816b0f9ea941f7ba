use std::sync::Arc;

use agendum_utils::DayOfWeek;
use dao::booking::BookingStatusEntity;
use rest::RestStateDef;
use service::{
    availability::{AvailabilityService, ConflictKind, RejectionReason},
    booking::{BookingCommitService, BookingRequest, BookingStatus},
    ServiceError,
};
use time::{macros::time, Date, Weekday};
use uuid::Uuid;

use crate::integration_test::{at, next, now, plus_minutes, TestSetup};

fn request(test_setup: &TestSetup, date: Date, start: time::Time) -> BookingRequest {
    BookingRequest {
        service_id: test_setup.service_id(),
        client_id: Uuid::new_v4(),
        start_time: at(date, start),
        duration_minutes: None,
        notes: Some("Integration test".into()),
    }
}

fn conflict_kinds(err: &ServiceError) -> Vec<ConflictKind> {
    match err {
        ServiceError::BookingConflict(conflicts) | ServiceError::NotBookable(conflicts) => {
            conflicts.iter().map(|conflict| conflict.kind).collect()
        }
        other => panic!("Expected a conflict but got {:?}", other),
    }
}

#[tokio::test]
async fn test_commit_stores_pending_booking() {
    let test_setup = TestSetup::new().await;
    let date = next(Weekday::Wednesday);
    let service = test_setup.rest_state.booking_commit_service();

    let booking = service
        .commit(&request(&test_setup, date, time!(11:00)))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.provider_id, test_setup.provider_id());
    assert_eq!(booking.end_time, plus_minutes(booking.start_time, 30));

    let stored = service.get(booking.id, None).await.unwrap();
    assert_eq!(stored.id, booking.id);
    assert_eq!(stored.start_time, booking.start_time);
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.notes.as_deref(), Some("Integration test"));

    let availability = test_setup
        .rest_state
        .availability_service()
        .get_availability(test_setup.service_id(), date, None, None)
        .await
        .unwrap();
    let unavailable = availability
        .slots
        .iter()
        .filter(|slot| !slot.is_available)
        .count();
    // 10:30 up to 11:30 collide with [10:55, 11:40).
    assert_eq!(unavailable, 5);
}

#[tokio::test]
async fn test_commit_conflicts_with_existing_booking() {
    let test_setup = TestSetup::new().await;
    let date = next(Weekday::Wednesday);
    let existing = test_setup
        .insert_booking(
            at(date, time!(14:00)),
            at(date, time!(14:30)),
            BookingStatusEntity::Confirmed,
        )
        .await;

    let err = test_setup
        .rest_state
        .booking_commit_service()
        .commit(&request(&test_setup, date, time!(14:15)))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(conflict_kinds(&err), vec![ConflictKind::Overlap]);
    if let ServiceError::BookingConflict(conflicts) = &err {
        assert_eq!(conflicts[0].booking_id, Some(existing));
    }

    let buffer_err = test_setup
        .rest_state
        .booking_commit_service()
        .commit(&request(&test_setup, date, time!(14:35)))
        .await
        .unwrap_err();
    assert_eq!(
        conflict_kinds(&buffer_err),
        vec![ConflictKind::BufferViolation]
    );

    // A completed booking does not block.
    test_setup
        .insert_booking(
            at(date, time!(16:00)),
            at(date, time!(16:30)),
            BookingStatusEntity::Completed,
        )
        .await;
    assert!(test_setup
        .rest_state
        .booking_commit_service()
        .commit(&request(&test_setup, date, time!(16:00)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_commit_outside_schedule_is_not_bookable() {
    let test_setup = TestSetup::new().await;
    test_setup
        .add_break(DayOfWeek::Thursday, time!(12:00), time!(13:00))
        .await;
    let date = next(Weekday::Thursday);
    let service = test_setup.rest_state.booking_commit_service();

    let early = service
        .commit(&request(&test_setup, date, time!(8:45)))
        .await
        .unwrap_err();
    assert!(!early.is_retryable());
    assert_eq!(
        conflict_kinds(&early),
        vec![ConflictKind::OutsideWorkingHours]
    );

    let lunch = service
        .commit(&request(&test_setup, date, time!(12:15)))
        .await
        .unwrap_err();
    assert_eq!(conflict_kinds(&lunch), vec![ConflictKind::BreakTime]);

    let sunday = service
        .commit(&request(&test_setup, next(Weekday::Sunday), time!(10:00)))
        .await
        .unwrap_err();
    assert_eq!(
        conflict_kinds(&sunday),
        vec![ConflictKind::OutsideWorkingHours]
    );
}

#[tokio::test]
async fn test_commit_respects_booking_window() {
    let test_setup = TestSetup::new().await;
    let service = test_setup.rest_state.booking_commit_service();

    let past = BookingRequest {
        start_time: plus_minutes(now(), -60),
        ..request(&test_setup, next(Weekday::Tuesday), time!(10:00))
    };
    let result = service.commit(&past).await;
    assert!(matches!(
        result,
        Err(ServiceError::BookingWindowViolation(
            RejectionReason::StartInPast | RejectionReason::PastDate
        ))
    ));

    let far = request(
        &test_setup,
        next(Weekday::Tuesday) + time::Duration::weeks(5),
        time!(10:00),
    );
    assert!(matches!(
        service.commit(&far).await,
        Err(ServiceError::BookingWindowViolation(
            RejectionReason::BeyondAdvanceWindow { .. }
        ))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commits_admit_exactly_one() {
    let test_setup = TestSetup::new().await;
    let date = next(Weekday::Friday);
    let service = test_setup.rest_state.booking_commit_service();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let booking_request = request(&test_setup, date, time!(14:00));
        handles.push(tokio::spawn(async move {
            service.commit(&booking_request).await
        }));
    }
    let mut committed = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(ServiceError::BookingConflict(_)) => conflicts += 1,
            Err(err) => panic!("Unexpected error {:?}", err),
        }
    }
    assert_eq!(committed, 1);
    assert_eq!(conflicts, 7);

    let availability = test_setup
        .rest_state
        .availability_service()
        .get_availability(test_setup.service_id(), date, None, None)
        .await
        .unwrap();
    assert_eq!(availability.blocked.len(), 1);
}

#[tokio::test]
async fn test_get_unknown_booking() {
    let test_setup = TestSetup::new().await;
    let id = Uuid::new_v4();
    let result = test_setup
        .rest_state
        .booking_commit_service()
        .get(id, None)
        .await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(not_found)) if not_found == id));
}
