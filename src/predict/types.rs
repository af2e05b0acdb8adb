use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Inertial (TEME) state at one evaluation time. Owned by the propagation
/// call that produced it; never cached.
#[derive(Debug, Clone, Copy)]
pub struct SatelliteState {
    pub timestamp: DateTime<Utc>,
    /// Position in km.
    pub position_km: [f64; 3],
    /// Velocity in km/s.
    pub velocity_km_s: [f64; 3],
}

/// Computed ground-track point in WGS84 geodetic coordinates.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeodeticPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}
