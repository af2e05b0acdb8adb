mod error;
mod frame;
mod ground_track;
mod propagator;
mod types;

pub use error::PredictError;
pub use frame::{ecef_to_geodetic, gmst_rad, teme_to_ecef, to_geodetic};
pub use ground_track::{GroundTrack, DEFAULT_HORIZON_SECONDS, DEFAULT_STEP_SECONDS};
pub use propagator::Propagator;
pub use types::{GeodeticPoint, SatelliteState};
