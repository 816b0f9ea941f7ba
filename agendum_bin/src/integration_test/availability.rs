use agendum_utils::{format_hh_mm, DayOfWeek};
use dao::booking::BookingStatusEntity;
use rest::RestStateDef;
use service::{
    availability::{AvailabilityResult, AvailabilityService, AvailabilityStatus, RejectionReason},
    ServiceError,
};
use time::{macros::time, Duration, Weekday};
use uuid::Uuid;

use crate::integration_test::{at, next, today, TestSetup};

fn starts(result: &AvailabilityResult, available: bool) -> Vec<String> {
    result
        .slots
        .iter()
        .filter(|slot| slot.is_available == available)
        .map(|slot| format_hh_mm(slot.range.start))
        .collect()
}

#[tokio::test]
async fn test_open_day_without_bookings() {
    let test_setup = TestSetup::new().await;
    let result = test_setup
        .rest_state
        .availability_service()
        .get_availability(test_setup.service_id(), next(Weekday::Tuesday), None, None)
        .await
        .unwrap();

    assert_eq!(result.status, AvailabilityStatus::Open);
    assert_eq!(result.slots.len(), 35);
    assert!(result.slots.iter().all(|slot| slot.is_available));
    assert_eq!(format_hh_mm(result.slots[0].range.start), "09:00");
    assert_eq!(format_hh_mm(result.slots[34].range.start), "17:30");
    assert_eq!(format_hh_mm(result.slots[34].range.end), "18:00");
    assert!(result.blocked.is_empty());
}

#[tokio::test]
async fn test_confirmed_booking_blocks_buffered_interval() {
    let test_setup = TestSetup::new().await;
    let date = next(Weekday::Tuesday);
    test_setup
        .insert_booking(
            at(date, time!(10:00)),
            at(date, time!(10:30)),
            BookingStatusEntity::Confirmed,
        )
        .await;
    test_setup
        .insert_booking(
            at(date, time!(15:00)),
            at(date, time!(15:30)),
            BookingStatusEntity::Cancelled,
        )
        .await;

    let result = test_setup
        .rest_state
        .availability_service()
        .get_availability(test_setup.service_id(), date, None, None)
        .await
        .unwrap();

    assert_eq!(
        starts(&result, false),
        vec!["09:30", "09:45", "10:00", "10:15", "10:30"]
    );
    assert!(starts(&result, true).contains(&"10:45".to_string()));
    assert!(starts(&result, true).contains(&"15:00".to_string()));
    assert_eq!(result.blocked.len(), 1);
    assert_eq!(format_hh_mm(result.blocked[0].range.start), "10:00");
    assert_eq!(result.blocked[0].reason.label(), "Existing booking");
}

#[tokio::test]
async fn test_sunday_is_closed_for_any_duration() {
    let test_setup = TestSetup::new().await;
    for duration in [None, Some(15), Some(240)] {
        let result = test_setup
            .rest_state
            .availability_service()
            .get_availability(test_setup.service_id(), next(Weekday::Sunday), duration, None)
            .await
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::ClosedDay);
        assert!(result.slots.is_empty());
        assert!(!result.working_hours.is_working_day);
    }
}

#[tokio::test]
async fn test_same_day_rejection_differs_from_closed_day() {
    let test_setup = TestSetup::new().await;
    let service_id = test_setup.create_service(30, false).await;
    let result = test_setup
        .rest_state
        .availability_service()
        .get_availability(service_id, today(), None, None)
        .await
        .unwrap();
    assert_eq!(
        result.status,
        AvailabilityStatus::PolicyRejected(RejectionReason::SameDayNotAllowed)
    );
    assert_eq!(result.status.reason_code(), Some("SAME_DAY_NOT_ALLOWED"));
    assert!(result.slots.is_empty());
}

#[tokio::test]
async fn test_advance_window_boundary() {
    let test_setup = TestSetup::new().await;
    let service = test_setup.rest_state.availability_service();

    let last_allowed = service
        .get_availability(test_setup.service_id(), today() + Duration::days(30), None, None)
        .await
        .unwrap();
    assert!(!matches!(
        last_allowed.status,
        AvailabilityStatus::PolicyRejected(_)
    ));

    let too_far = service
        .get_availability(test_setup.service_id(), today() + Duration::days(31), None, None)
        .await
        .unwrap();
    assert_eq!(
        too_far.status,
        AvailabilityStatus::PolicyRejected(RejectionReason::BeyondAdvanceWindow {
            max_advance_booking_days: 30
        })
    );
}

#[tokio::test]
async fn test_breaks_block_slots() {
    let test_setup = TestSetup::new().await;
    test_setup
        .add_break(DayOfWeek::Tuesday, time!(12:00), time!(13:00))
        .await;
    let result = test_setup
        .rest_state
        .availability_service()
        .get_availability(test_setup.service_id(), next(Weekday::Tuesday), None, None)
        .await
        .unwrap();

    assert_eq!(
        starts(&result, false),
        vec!["11:45", "12:00", "12:15", "12:30", "12:45"]
    );
    assert_eq!(result.working_hours.breaks.len(), 1);
    assert_eq!(result.blocked[0].reason.label(), "Break time");
}

#[tokio::test]
async fn test_unknown_service() {
    let test_setup = TestSetup::new().await;
    let unknown = Uuid::new_v4();
    let result = test_setup
        .rest_state
        .availability_service()
        .get_availability(unknown, next(Weekday::Tuesday), None, None)
        .await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(id)) if id == unknown));
}

#[tokio::test]
async fn test_suggestions_start_at_first_free_day() {
    let test_setup = TestSetup::new().await;
    let suggestions = test_setup
        .rest_state
        .availability_service()
        .suggest_slots(test_setup.service_id(), next(Weekday::Sunday), None)
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 10);
    let monday = next(Weekday::Sunday) + Duration::days(1);
    assert_eq!(suggestions[0].date, monday);
    assert_eq!(suggestions[0].start_time, at(monday, time!(9:00)));
    assert_eq!(suggestions[2].start_time, at(monday, time!(9:30)));
    assert_eq!(suggestions[3].date, monday + Duration::days(1));
}
