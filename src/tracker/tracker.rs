use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::error::TrackerError;
use super::sample::PositionSample;
use crate::store::StoreError;
use crate::telemetry::TelemetrySource;

/// Persistence seam for observed position samples. Duplicate timestamps
/// are the store's problem (upsert semantics), not the loop's.
#[async_trait]
pub trait SampleStore: Send + Sync {
    async fn upsert(&self, sample: &PositionSample) -> Result<(), StoreError>;
    async fn latest(&self) -> Result<Option<PositionSample>, StoreError>;
    async fn all(&self) -> Result<Vec<PositionSample>, StoreError>;
}

/// Observability snapshot of the loop. The failure counter resets on the
/// first success after a failure streak.
#[derive(Debug, Clone, Default, Serialize, utoipa::ToSchema)]
pub struct TrackerStatus {
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_sample: Option<PositionSample>,
}

struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Periodic background loop: one telemetry fetch and one upsert per tick,
/// failures logged and skipped, never fatal. Runs for the process
/// lifetime in production; tests drive single ticks through `run_tick`.
pub struct TrackingLoop {
    telemetry: Arc<dyn TelemetrySource>,
    samples: Arc<dyn SampleStore>,
    interval: Duration,
    shared: Arc<StdMutex<TrackerStatus>>,
    worker: Option<WorkerHandle>,
}

impl TrackingLoop {
    pub fn new(
        telemetry: Arc<dyn TelemetrySource>,
        samples: Arc<dyn SampleStore>,
        interval: Duration,
    ) -> Self {
        Self {
            telemetry,
            samples,
            interval,
            shared: Arc::new(StdMutex::new(TrackerStatus::default())),
            worker: None,
        }
    }

    /// Shared status handle for request handlers.
    pub fn status_handle(&self) -> Arc<StdMutex<TrackerStatus>> {
        self.shared.clone()
    }

    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.worker.is_some() {
            return Err(TrackerError::AlreadyRunning);
        }

        let telemetry = self.telemetry.clone();
        let samples = self.samples.clone();
        let shared = self.shared.clone();
        let interval = self.interval;
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let join = tokio::spawn(async move {
            log::info!("tracking loop started (interval {:?})", interval);
            loop {
                run_tick(telemetry.as_ref(), samples.as_ref(), &shared).await;

                let should_stop = tokio::select! {
                    _ = sleep(interval) => false,
                    _ = &mut stop_rx => true,
                };
                if should_stop {
                    log::info!("tracking loop stopped");
                    return;
                }
            }
        });

        self.worker = Some(WorkerHandle { stop_tx, join });
        Ok(())
    }

    /// Production runs for the process lifetime; tests stop the worker.
    #[allow(dead_code)]
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
        }
    }
}

/// One tick: fetch, persist, update counters. All failures are absorbed
/// here; the next opportunity is the next scheduled tick.
pub async fn run_tick(
    telemetry: &dyn TelemetrySource,
    samples: &dyn SampleStore,
    shared: &StdMutex<TrackerStatus>,
) {
    let attempted_at = Utc::now();

    let sample = match telemetry.current_position().await {
        Ok(sample) => sample,
        Err(e) => {
            log::warn!("telemetry fetch failed, skipping tick: {}", e);
            record_failure(shared, attempted_at);
            return;
        }
    };

    match samples.upsert(&sample).await {
        Ok(()) => {
            log::info!(
                "persisted position sample {} ({:.4}, {:.4})",
                sample.timestamp,
                sample.latitude,
                sample.longitude
            );
            let mut locked = shared.lock().unwrap();
            locked.last_attempt = Some(attempted_at);
            locked.consecutive_failures = 0;
            locked.last_sample = Some(sample);
        }
        Err(e) => {
            log::warn!("failed to persist position sample: {}", e);
            record_failure(shared, attempted_at);
        }
    }
}

fn record_failure(shared: &StdMutex<TrackerStatus>, attempted_at: DateTime<Utc>) {
    let mut locked = shared.lock().unwrap();
    locked.last_attempt = Some(attempted_at);
    locked.consecutive_failures += 1;
}
