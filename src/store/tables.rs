use std::sync::Arc;

use async_trait::async_trait;

use super::client::RecordStore;
use super::error::StoreError;
use crate::elements::{ElementRecords, ElementSet};
use crate::tracker::{PositionSample, SampleStore};

/// Element set table, ordered by epoch. Refreshes are idempotent inserts;
/// a newer epoch supersedes, nothing is mutated.
pub struct ElementTable {
    store: Arc<RecordStore>,
    table: String,
}

impl ElementTable {
    pub fn new(store: Arc<RecordStore>, table: String) -> Self {
        Self { store, table }
    }
}

#[async_trait]
impl ElementRecords for ElementTable {
    async fn latest(&self) -> Result<Option<ElementSet>, StoreError> {
        self.store.select_latest(&self.table, "epoch").await
    }

    async fn insert(&self, set: &ElementSet) -> Result<(), StoreError> {
        self.store.insert(&self.table, set).await
    }
}

/// Observed position table, ordered by timestamp.
pub struct PositionTable {
    store: Arc<RecordStore>,
    table: String,
}

impl PositionTable {
    pub fn new(store: Arc<RecordStore>, table: String) -> Self {
        Self { store, table }
    }
}

#[async_trait]
impl SampleStore for PositionTable {
    async fn upsert(&self, sample: &PositionSample) -> Result<(), StoreError> {
        self.store.upsert(&self.table, sample).await
    }

    async fn latest(&self) -> Result<Option<PositionSample>, StoreError> {
        self.store.select_latest(&self.table, "timestamp").await
    }

    async fn all(&self) -> Result<Vec<PositionSample>, StoreError> {
        self.store.select_all(&self.table, "timestamp").await
    }
}
