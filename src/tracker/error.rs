use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracking loop already running")]
    AlreadyRunning,
}
