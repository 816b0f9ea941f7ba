use std::sync::Arc;

mod availability;
mod booking;

use axum::{body::Body, response::Response, routing::get, Router};
use rest_types::{CommitRejectionTO, ConflictTO};
use service::{availability::Conflict, ServiceError};
use thiserror::Error;
use tracing::instrument;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] ServiceError),

    #[error("Bad request: {0}")]
    BadRequest(Arc<str>),
}

fn json_response(status: u16, body: String) -> Response {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(body))
        .unwrap()
}

fn text_response(status: u16, body: String) -> Response {
    Response::builder()
        .status(status)
        .body(Body::new(body))
        .unwrap()
}

fn commit_rejection(
    status: u16,
    code: &str,
    err: &ServiceError,
    conflicts: &[Conflict],
) -> Response {
    let rejection = CommitRejectionTO {
        code: code.into(),
        message: err.to_string(),
        retryable: err.is_retryable(),
        conflicts: conflicts.iter().map(ConflictTO::from).collect(),
    };
    json_response(status, serde_json::to_string(&rejection).unwrap())
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::BadRequest(_)) => text_response(400, err.to_string()),
        Err(RestError::ServiceError(err)) => match &err {
            ServiceError::EntityNotFound(id) => text_response(404, id.to_string()),
            ServiceError::ValidationError(_) | ServiceError::TimeComponentRange(_) => {
                text_response(422, err.to_string())
            }
            ServiceError::BookingWindowViolation(reason) => {
                commit_rejection(422, reason.code(), &err, &[])
            }
            ServiceError::NotBookable(conflicts) => {
                commit_rejection(422, "NOT_BOOKABLE", &err, conflicts)
            }
            ServiceError::BookingConflict(conflicts) => {
                commit_rejection(409, "BOOKING_CONFLICT", &err, conflicts)
            }
            ServiceError::StoreTimeout(_) | ServiceError::CommitLockTimeout(_) => {
                tracing::warn!("Responding with 503: {}", err);
                text_response(503, err.to_string())
            }
            ServiceError::DatabaseQueryError(_)
            | ServiceError::InvalidWorkingHours(_)
            | ServiceError::InternalError => {
                tracing::error!("Responding with 500: {}", err);
                text_response(500, err.to_string())
            }
        },
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type AvailabilityService: service::availability::AvailabilityService + Send + Sync + 'static;
    type BookingCommitService: service::booking::BookingCommitService + Send + Sync + 'static;

    fn availability_service(&self) -> Arc<Self::AvailabilityService>;
    fn booking_commit_service(&self) -> Arc<Self::BookingCommitService>;
}

#[instrument]
#[utoipa::path(
    get,
    path = "/version",
    tags = ["Meta"],
    responses(
        (status = 200, description = "Backend version", body = String),
    ),
)]
pub async fn get_version() -> Response {
    text_response(200, env!("CARGO_PKG_VERSION").to_string())
}

#[derive(OpenApi)]
#[openapi(
    paths(get_version),
    nest(
        (path = "/service", api = availability::AvailabilityApiDoc),
        (path = "/booking", api = booking::BookingApiDoc),
    ),
    tags(
        (name = "Availability", description = "Bookable slots of a service"),
        (name = "Booking", description = "Committing and reading bookings"),
    )
)]
pub struct ApiDoc;

pub fn build_router<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .route("/version", get(get_version))
        .nest("/service", availability::generate_route())
        .nest("/booking", booking::generate_route())
        .with_state(rest_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

pub async fn start_server<RestState: RestStateDef>(rest_state: RestState, bind_address: &str) {
    let app = build_router(rest_state);
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .expect("Could not bind server");
    tracing::info!("Listening on {}", bind_address);
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}
