use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use axum::{routing::get, routing::post, Router};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::elements::{ElementStore, ElementsError};
use crate::store::{ElementTable, PositionTable, RecordStore, StoreError};
use crate::telemetry::{OpenNotifyClient, TelemetryError, TelemetrySource};
use crate::tracker::{SampleStore, TrackerError, TrackerStatus, TrackingLoop};

use super::api_doc::ApiDoc;
use super::config::{Config, PredictConfig};
use super::handlers;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("elements error: {0}")]
    Elements(#[from] ElementsError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

#[derive(Clone)]
pub struct AppState {
    pub elements: Arc<ElementStore>,
    pub samples: Arc<dyn SampleStore>,
    pub tracker_status: Arc<StdMutex<TrackerStatus>>,
    pub predict: PredictConfig,
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let record_store = Arc::new(RecordStore::new(&config.store.url, &config.store.api_key)?);

    let elements = Arc::new(ElementStore::new(
        Box::new(ElementTable::new(
            record_store.clone(),
            config.store.elements_table.clone(),
        )),
        config.elements.source_url.clone(),
    )?);

    let samples: Arc<dyn SampleStore> = Arc::new(PositionTable::new(
        record_store.clone(),
        config.store.positions_table.clone(),
    ));

    let telemetry: Arc<dyn TelemetrySource> =
        Arc::new(OpenNotifyClient::new(config.telemetry.url.clone())?);

    let mut tracking = TrackingLoop::new(
        telemetry,
        samples.clone(),
        Duration::from_secs(config.tracker.interval_seconds),
    );
    tracking.start()?;

    let state = AppState {
        elements,
        samples,
        tracker_status: tracking.status_handle(),
        predict: config.predict.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Tracking endpoints
        .route("/api/position", get(handlers::latest_position))
        .route("/api/track", get(handlers::track_history))
        .route("/api/tracker/status", get(handlers::tracker_status))
        // Prediction endpoints
        .route("/api/predict", get(handlers::predict_track))
        .route("/api/elements", get(handlers::current_elements))
        .route("/api/elements/refresh", post(handlers::refresh_elements))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("starting server on {}", config.web.bind);

    let listener = tokio::net::TcpListener::bind(&config.web.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
