use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the hosted record store's REST interface (PostgREST
/// dialect). One instance is constructed at startup and shared behind an
/// `Arc` by the tracking loop and the request handlers.
pub struct RecordStore {
    base_url: String,
    client: reqwest::Client,
}

impl RecordStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, StoreError> {
        let key = HeaderValue::from_str(api_key).map_err(|_| StoreError::InvalidApiKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StoreError::InvalidApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Latest row by `order_column`, or `None` when the table is empty.
    pub async fn select_latest<T: DeserializeOwned>(
        &self,
        table: &str,
        order_column: &str,
    ) -> Result<Option<T>, StoreError> {
        let order = format!("{}.desc", order_column);
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", order.as_str()), ("limit", "1")])
            .send()
            .await?;
        let mut rows: Vec<T> = Self::check(response).await?.json().await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// All rows, ascending by `order_column`.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order_column: &str,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", order_column)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url(table))
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Insert that tolerates duplicate keys; the new row replaces the old
    /// one (last-write-wins).
    pub async fn upsert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates")
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
