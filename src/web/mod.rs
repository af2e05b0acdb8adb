mod api_doc;
mod config;
mod handlers;
mod server;

pub use config::{Config, ConfigError, PredictConfig};
pub use server::{run_server, AppState, ServerError};
