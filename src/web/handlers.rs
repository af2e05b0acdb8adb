use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::elements::{ElementSet, ElementsError};
use crate::predict::{GeodeticPoint, GroundTrack, PredictError, Propagator};
use crate::store::StoreError;
use crate::tracker::{PositionSample, TrackerStatus};

use super::server::AppState;

// Unified API error type
pub enum ApiError {
    Elements(ElementsError),
    Predict(PredictError),
    Store(StoreError),
    NoSamples,
}

impl From<ElementsError> for ApiError {
    fn from(e: ElementsError) -> Self {
        ApiError::Elements(e)
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Elements(ElementsError::NoElementSetAvailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("no_element_set")),
            )
                .into_response(),
            ApiError::Elements(e) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("element_set_error", &e.to_string())),
            )
                .into_response(),
            ApiError::Predict(PredictError::InvalidParameter(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("invalid_parameter", msg)),
            )
                .into_response(),
            ApiError::Predict(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("propagation_error", &e.to_string())),
            )
                .into_response(),
            ApiError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("store_error", &e.to_string())),
            )
                .into_response(),
            ApiError::NoSamples => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("no_position_samples")),
            )
                .into_response(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictQuery {
    #[serde(default)]
    pub horizon_seconds: Option<i64>,
    #[serde(default)]
    pub step_seconds: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/position",
    responses(
        (status = 200, description = "Latest observed position", body = PositionSample),
        (status = 404, description = "No samples persisted yet", body = ErrorResponse)
    )
)]
pub async fn latest_position(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    match state.samples.latest().await? {
        Some(sample) => Ok((StatusCode::OK, Json(sample))),
        None => Err(ApiError::NoSamples),
    }
}

#[utoipa::path(
    get,
    path = "/api/track",
    responses(
        (status = 200, description = "All observed positions, time-ordered", body = Vec<PositionSample>)
    )
)]
pub async fn track_history(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let samples = state.samples.all().await?;
    Ok((StatusCode::OK, Json(samples)))
}

#[utoipa::path(
    get,
    path = "/api/predict",
    params(
        ("horizon_seconds" = Option<i64>, Query, description = "Prediction horizon in seconds (default 5400)"),
        ("step_seconds" = Option<i64>, Query, description = "Sample step in seconds (default 60)")
    ),
    responses(
        (status = 200, description = "Predicted ground track", body = Vec<GeodeticPoint>),
        (status = 400, description = "Invalid horizon or step", body = ErrorResponse),
        (status = 503, description = "No element set available", body = ErrorResponse)
    )
)]
pub async fn predict_track(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
) -> ApiResult<impl IntoResponse> {
    let horizon = query.horizon_seconds.unwrap_or(state.predict.horizon_seconds);
    let step = query.step_seconds.unwrap_or(state.predict.step_seconds);

    let set = state.elements.current().await?;
    let propagator = Propagator::from_element_set(&set)?;
    let points: Vec<GeodeticPoint> =
        GroundTrack::new(&propagator, Utc::now(), horizon, step)?.collect();

    Ok((StatusCode::OK, Json(points)))
}

#[utoipa::path(
    get,
    path = "/api/elements",
    responses(
        (status = 200, description = "Current element set", body = ElementSet),
        (status = 503, description = "No element set available", body = ErrorResponse)
    )
)]
pub async fn current_elements(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let set = state.elements.current().await?;
    Ok((StatusCode::OK, Json(set)))
}

#[utoipa::path(
    post,
    path = "/api/elements/refresh",
    responses(
        (status = 200, description = "Freshly fetched element set", body = ElementSet),
        (status = 502, description = "Publication source unreachable", body = ErrorResponse)
    )
)]
pub async fn refresh_elements(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let set = state.elements.refresh().await?;
    Ok((StatusCode::OK, Json(set)))
}

#[utoipa::path(
    get,
    path = "/api/tracker/status",
    responses(
        (status = 200, description = "Tracking loop status", body = TrackerStatus)
    )
)]
pub async fn tracker_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.tracker_status.lock().unwrap().clone();
    (StatusCode::OK, Json(status))
}
