use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rest_types::{BookingRequestTO, BookingTO, CommitRejectionTO};
use service::booking::BookingCommitService;
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", post(create_booking::<RestState>))
        .route("/{id}", get(get_booking::<RestState>))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Booking"],
    request_body = BookingRequestTO,
    responses(
        (status = 201, description = "Booking stored as pending", body = BookingTO),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Overlaps an existing booking, re-fetch availability and retry", body = CommitRejectionTO),
        (status = 422, description = "Outside the booking window or the working hours", body = CommitRejectionTO),
        (status = 503, description = "Commit lock or store timeout, retry"),
    ),
)]
pub async fn create_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(request): Json<BookingRequestTO>,
) -> Response {
    error_handler(
        (async {
            let booking = BookingTO::from(
                &rest_state
                    .booking_commit_service()
                    .commit(&(&request).into())
                    .await?,
            );
            Ok(json_response(201, serde_json::to_string(&booking).unwrap()))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Booking"],
    params(
        ("id", description = "Booking id", example = "cea260a0-112b-4970-936c-f7e529955bd0"),
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingTO),
        (status = 404, description = "Booking not found"),
    ),
)]
pub async fn get_booking<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(booking_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let booking = BookingTO::from(
                &rest_state
                    .booking_commit_service()
                    .get(booking_id, None)
                    .await?,
            );
            Ok(json_response(200, serde_json::to_string(&booking).unwrap()))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(create_booking, get_booking),
    components(schemas(BookingRequestTO, BookingTO, CommitRejectionTO))
)]
pub struct BookingApiDoc;
