mod client;
mod error;

pub use client::{OpenNotifyClient, TelemetrySource};
pub use error::TelemetryError;
