mod error;
mod sample;
mod tracker;

pub use error::TrackerError;
pub use sample::PositionSample;
pub use tracker::{SampleStore, TrackerStatus, TrackingLoop};
