use agendum_utils::parse_iso_date;
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use rest_types::{AvailabilityTO, SuggestedSlotTO};
use serde::Deserialize;
use service::availability::AvailabilityService;
use time::Date;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;

use crate::{error_handler, json_response, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/{id}/availability", get(get_availability::<RestState>))
        .route("/{id}/suggestions", get(get_suggestions::<RestState>))
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQueryParams {
    #[param(example = "2026-10-20")]
    pub date: String,

    /// Overrides the duration of the service.
    #[param(example = "45")]
    pub duration: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionQueryParams {
    #[param(example = "2026-10-20")]
    pub from: String,
}

fn parse_date(value: &str) -> Result<Date, RestError> {
    parse_iso_date(value).map_err(|err| RestError::BadRequest(err.to_string().into()))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}/availability",
    tags = ["Availability"],
    params(
        ("id", description = "Service id", example = "0b3e7d21-6c8f-4f2a-8d15-93e0a4c5e200"),
        AvailabilityQueryParams,
    ),
    responses(
        (status = 200, description = "Slots of the day, closed days and policy rejections included", body = AvailabilityTO),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Service or provider not found"),
        (status = 422, description = "Invalid duration"),
        (status = 503, description = "Store timeout"),
    ),
)]
pub async fn get_availability<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(service_id): Path<Uuid>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Response {
    error_handler(
        (async {
            let date = parse_date(&params.date)?;
            let availability = AvailabilityTO::from(
                &rest_state
                    .availability_service()
                    .get_availability(service_id, date, params.duration, None)
                    .await?,
            );
            Ok(json_response(
                200,
                serde_json::to_string(&availability).unwrap(),
            ))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}/suggestions",
    tags = ["Availability"],
    params(
        ("id", description = "Service id", example = "0b3e7d21-6c8f-4f2a-8d15-93e0a4c5e200"),
        SuggestionQueryParams,
    ),
    responses(
        (status = 200, description = "Available slots of the following days", body = [SuggestedSlotTO]),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Service or provider not found"),
    ),
)]
pub async fn get_suggestions<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(service_id): Path<Uuid>,
    Query(params): Query<SuggestionQueryParams>,
) -> Response {
    error_handler(
        (async {
            let from = parse_date(&params.from)?;
            let suggestions: Vec<SuggestedSlotTO> = rest_state
                .availability_service()
                .suggest_slots(service_id, from, None)
                .await?
                .iter()
                .map(SuggestedSlotTO::from)
                .collect();
            Ok(json_response(
                200,
                serde_json::to_string(&suggestions).unwrap(),
            ))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(get_availability, get_suggestions),
    components(schemas(AvailabilityTO, SuggestedSlotTO))
)]
pub struct AvailabilityApiDoc;
