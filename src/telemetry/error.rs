use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("telemetry request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telemetry endpoint returned status {0}")]
    Status(u16),
    #[error("malformed telemetry response: {0}")]
    Malformed(String),
}
