use utoipa::OpenApi;

use super::handlers::{ErrorResponse, PredictQuery};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::latest_position,
        super::handlers::track_history,
        super::handlers::predict_track,
        super::handlers::current_elements,
        super::handlers::refresh_elements,
        super::handlers::tracker_status,
    ),
    components(
        schemas(
            ErrorResponse,
            PredictQuery,
            crate::elements::ElementSet,
            crate::predict::GeodeticPoint,
            crate::tracker::PositionSample,
            crate::tracker::TrackerStatus,
        )
    ),
    info(
        title = "ISS Watch API",
        description = "ISS live tracking and orbit prediction",
        version = "0.1.0"
    ),
    tags(
        (name = "tracking", description = "Observed positions and loop status"),
        (name = "prediction", description = "Element sets and ground-track prediction")
    )
)]
pub struct ApiDoc;
