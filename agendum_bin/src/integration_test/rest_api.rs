use agendum_utils::format_iso_date;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use dao::booking::BookingStatusEntity;
use http_body_util::BodyExt;
use rest_types::{AvailabilityTO, BookingRequestTO, BookingStatusTO, BookingTO, CommitRejectionTO};
use time::{macros::time, Weekday};
use tower::ServiceExt;
use uuid::Uuid;

use crate::integration_test::{at, next, TestSetup};

async fn send(test_setup: &TestSetup, request: Request<Body>) -> Response {
    rest::build_router(test_setup.rest_state.clone())
        .oneshot(request)
        .await
        .unwrap()
}

async fn get(test_setup: &TestSetup, uri: &str) -> Response {
    send(
        test_setup,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post_booking(test_setup: &TestSetup, booking: &BookingRequestTO) -> Response {
    send(
        test_setup,
        Request::builder()
            .method("POST")
            .uri("/booking")
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(booking).unwrap()))
            .unwrap(),
    )
    .await
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn test_availability_json() {
    let test_setup = TestSetup::new().await;
    let date = next(Weekday::Tuesday);
    test_setup
        .insert_booking(
            at(date, time!(10:00)),
            at(date, time!(10:30)),
            BookingStatusEntity::Pending,
        )
        .await;

    let response = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date={}",
            test_setup.service_id(),
            format_iso_date(date)
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let availability: AvailabilityTO =
        serde_json::from_slice(&body_bytes(response).await).unwrap();

    assert_eq!(availability.status, "OPEN");
    assert_eq!(availability.reason_code, None);
    assert_eq!(availability.working_hours.start, "09:00");
    assert_eq!(availability.working_hours.end, "18:00");
    assert!(availability.working_hours.is_working_day);
    assert_eq!(availability.available_slots[0].start_time, "09:00");
    assert_eq!(availability.available_slots[0].end_time, "09:30");
    assert_eq!(availability.blocked_slots.len(), 1);
    assert_eq!(availability.blocked_slots[0].start_time, "10:00");
    assert_eq!(availability.blocked_slots[0].end_time, "10:30");
    assert_eq!(availability.blocked_slots[0].reason, "Existing booking");
}

#[tokio::test]
async fn test_availability_duration_override_and_closed_day() {
    let test_setup = TestSetup::new().await;
    let response = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date={}&duration=60",
            test_setup.service_id(),
            format_iso_date(next(Weekday::Tuesday))
        ),
    )
    .await;
    let availability: AvailabilityTO =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(availability.duration_minutes, 60);
    assert_eq!(availability.available_slots.len(), 33);

    let response = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date={}",
            test_setup.service_id(),
            format_iso_date(next(Weekday::Sunday))
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    let raw: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        raw["workingHours"],
        serde_json::json!({
            "start": "00:00",
            "end": "00:00",
            "isWorkingDay": false,
            "breaks": [],
        })
    );
    let availability: AvailabilityTO = serde_json::from_slice(&body).unwrap();
    assert_eq!(availability.status, "CLOSED_DAY");
    assert!(!availability.working_hours.is_working_day);
    assert_eq!(availability.working_hours.start, "00:00");
    assert_eq!(availability.working_hours.end, "00:00");
    assert!(availability.available_slots.is_empty());
}

#[tokio::test]
async fn test_bad_requests() {
    let test_setup = TestSetup::new().await;
    let malformed = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date=20-10-2026",
            test_setup.service_id()
        ),
    )
    .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let zero_duration = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date={}&duration=0",
            test_setup.service_id(),
            format_iso_date(next(Weekday::Tuesday))
        ),
    )
    .await;
    assert_eq!(zero_duration.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let unknown = get(
        &test_setup,
        &format!(
            "/service/{}/availability?date={}",
            Uuid::new_v4(),
            format_iso_date(next(Weekday::Tuesday))
        ),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let missing_booking = get(&test_setup, &format!("/booking/{}", Uuid::new_v4())).await;
    assert_eq!(missing_booking.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_commit_over_http() {
    let test_setup = TestSetup::new().await;
    let booking_request = BookingRequestTO {
        service_id: test_setup.service_id(),
        client_id: Uuid::new_v4(),
        start_time: at(next(Weekday::Thursday), time!(14:00)),
        duration_minutes: None,
        notes: None,
    };

    let created = post_booking(&test_setup, &booking_request).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let booking: BookingTO = serde_json::from_slice(&body_bytes(created).await).unwrap();
    assert_eq!(booking.status, BookingStatusTO::Pending);

    let fetched = get(&test_setup, &format!("/booking/{}", booking.id)).await;
    assert_eq!(fetched.status(), StatusCode::OK);

    let conflicting = post_booking(&test_setup, &booking_request).await;
    assert_eq!(conflicting.status(), StatusCode::CONFLICT);
    let rejection: CommitRejectionTO =
        serde_json::from_slice(&body_bytes(conflicting).await).unwrap();
    assert_eq!(rejection.code, "BOOKING_CONFLICT");
    assert!(rejection.retryable);
    assert_eq!(rejection.conflicts.len(), 1);
    assert_eq!(rejection.conflicts[0].kind, "OVERLAP");
    assert_eq!(rejection.conflicts[0].booking_id, Some(booking.id));

    let outside = post_booking(
        &test_setup,
        &BookingRequestTO {
            start_time: at(next(Weekday::Thursday), time!(18:00)),
            ..booking_request.clone()
        },
    )
    .await;
    assert_eq!(outside.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let rejection: CommitRejectionTO =
        serde_json::from_slice(&body_bytes(outside).await).unwrap();
    assert_eq!(rejection.code, "NOT_BOOKABLE");
    assert!(!rejection.retryable);
}

#[tokio::test]
async fn test_version_and_openapi() {
    let test_setup = TestSetup::new().await;
    let version = get(&test_setup, "/version").await;
    assert_eq!(version.status(), StatusCode::OK);
    assert_eq!(
        body_bytes(version).await,
        env!("CARGO_PKG_VERSION").as_bytes()
    );

    let openapi = get(&test_setup, "/api-docs/openapi.json").await;
    assert_eq!(openapi.status(), StatusCode::OK);
    let document: serde_json::Value =
        serde_json::from_slice(&body_bytes(openapi).await).unwrap();
    assert!(document["paths"]
        .get("/service/{id}/availability")
        .is_some());
    assert!(document["paths"].get("/booking/{id}").is_some());
}
