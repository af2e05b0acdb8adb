use std::time::Duration;

use async_trait::async_trait;

use super::error::ElementsError;
use super::set::ElementSet;
use crate::store::StoreError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Persistence seam for element sets. The production implementation lives
/// in `store::tables`; tests substitute an in-memory one.
#[async_trait]
pub trait ElementRecords: Send + Sync {
    async fn latest(&self) -> Result<Option<ElementSet>, StoreError>;
    async fn insert(&self, set: &ElementSet) -> Result<(), StoreError>;
}

/// Element set cache with an explicit refresh policy: `current` never
/// re-fetches while a cached set exists, `refresh` always does.
pub struct ElementStore {
    records: Box<dyn ElementRecords>,
    source_url: String,
    client: reqwest::Client,
}

impl ElementStore {
    pub fn new(
        records: Box<dyn ElementRecords>,
        source_url: String,
    ) -> Result<Self, ElementsError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            records,
            source_url,
            client,
        })
    }

    /// Most recent epoch-ordered cached set. Only when the store is empty
    /// is a fresh set fetched and persisted first; a fetch failure in that
    /// case is fatal to the calling request, not the process.
    pub async fn current(&self) -> Result<ElementSet, ElementsError> {
        if let Some(set) = self.records.latest().await? {
            return Ok(set);
        }

        log::info!("no cached element set, fetching from publication source");
        match self.refresh().await {
            Ok(set) => Ok(set),
            Err(e) => {
                log::error!("element set fetch with empty cache failed: {}", e);
                Err(ElementsError::NoElementSetAvailable)
            }
        }
    }

    /// Fetch a fresh set from the publication source, validate that the
    /// propagation model accepts it, persist it and return it. The old set
    /// is superseded by epoch ordering, never overwritten.
    pub async fn refresh(&self) -> Result<ElementSet, ElementsError> {
        let response = self.client.get(&self.source_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ElementsError::FetchStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let set = ElementSet::from_source_text(&text)?;

        self.records.insert(&set).await?;
        log::info!("persisted element set '{}' (epoch {})", set.name, set.epoch);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;

    struct FixedRecords {
        set: ElementSet,
        reads: Arc<AtomicU32>,
    }

    #[async_trait]
    impl ElementRecords for FixedRecords {
        async fn latest(&self) -> Result<Option<ElementSet>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.set.clone()))
        }

        async fn insert(&self, _set: &ElementSet) -> Result<(), StoreError> {
            panic!("current() must not persist while a cached set exists");
        }
    }

    struct EmptyRecords;

    #[async_trait]
    impl ElementRecords for EmptyRecords {
        async fn latest(&self) -> Result<Option<ElementSet>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, _set: &ElementSet) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn sample_set() -> ElementSet {
        ElementSet {
            name: "ISS (ZARYA)".to_string(),
            line1: "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927"
                .to_string(),
            line2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537"
                .to_string(),
            epoch: Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 40).unwrap(),
        }
    }

    #[tokio::test]
    async fn current_is_idempotent_without_refresh() {
        let reads = Arc::new(AtomicU32::new(0));
        let store = ElementStore::new(
            Box::new(FixedRecords {
                set: sample_set(),
                reads: reads.clone(),
            }),
            // Unroutable on purpose: a cached set must never trigger a fetch.
            "http://127.0.0.1:9/tle".to_string(),
        )
        .unwrap();

        let first = store.current().await.unwrap();
        let second = store.current().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_cache_with_failing_fetch_is_a_distinct_error() {
        let store = ElementStore::new(
            Box::new(EmptyRecords),
            "http://127.0.0.1:9/tle".to_string(),
        )
        .unwrap();

        assert!(matches!(
            store.current().await,
            Err(ElementsError::NoElementSetAvailable)
        ));
    }
}
