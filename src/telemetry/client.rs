use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use super::error::TelemetryError;
use crate::tracker::PositionSample;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of observed ground-track positions. The tracking loop only sees
/// this trait, so tests can drive it with scripted successes and failures.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn current_position(&self) -> Result<PositionSample, TelemetryError>;
}

/// Live position feed. The endpoint reports coordinates as JSON strings,
/// so the numeric conversion happens here at the boundary.
pub struct OpenNotifyClient {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    timestamp: i64,
    iss_position: LivePosition,
}

#[derive(Debug, Deserialize)]
struct LivePosition {
    latitude: String,
    longitude: String,
}

impl OpenNotifyClient {
    pub fn new(url: String) -> Result<Self, TelemetryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl TelemetrySource for OpenNotifyClient {
    async fn current_position(&self) -> Result<PositionSample, TelemetryError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TelemetryError::Status(status.as_u16()));
        }

        let body: LiveResponse = response.json().await?;
        body.try_into()
    }
}

impl TryFrom<LiveResponse> for PositionSample {
    type Error = TelemetryError;

    fn try_from(body: LiveResponse) -> Result<Self, TelemetryError> {
        let timestamp = DateTime::from_timestamp(body.timestamp, 0)
            .ok_or_else(|| TelemetryError::Malformed(format!("timestamp {}", body.timestamp)))?;
        let latitude = body
            .iss_position
            .latitude
            .parse::<f64>()
            .map_err(|_| TelemetryError::Malformed(format!("latitude {:?}", body.iss_position.latitude)))?;
        let longitude = body
            .iss_position
            .longitude
            .parse::<f64>()
            .map_err(|_| TelemetryError::Malformed(format!("longitude {:?}", body.iss_position.longitude)))?;

        Ok(PositionSample {
            timestamp,
            latitude,
            longitude,
        })
    }
}
