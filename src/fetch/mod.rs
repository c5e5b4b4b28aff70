// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::report::ReportType;

pub mod types;
pub mod urls;

pub use types::{District, Municipality, Province, ReportRow};
use urls::Page;

/// Result of one catalog call. Transport errors, non-2xx statuses and
/// undecodable bodies all land in `Failed`; an empty array is `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// Collapse to the data, treating `Empty` and `Failed` alike.
    pub fn into_data(self) -> Option<T> {
        match self {
            FetchOutcome::Data(d) => Some(d),
            FetchOutcome::Empty | FetchOutcome::Failed(_) => None,
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    /// Collapse to a list; anything but `Data` is an empty list.
    pub fn into_vec(self) -> Vec<T> {
        self.into_data().unwrap_or_default()
    }
}

/// Thin client over the statistics API. One GET per call, no retries.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base: Url,
    page: Page,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building HTTP client")?;
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("parsing base URL {}", config.base_url))?;
        Ok(Self::with_client(client, base, config.page()))
    }

    pub fn with_client(client: Client, base: Url, page: Page) -> Self {
        Self { client, base, page }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn provinces(&self) -> FetchOutcome<Vec<Province>> {
        self.get_list(&urls::provinces()).await
    }

    pub async fn districts(&self, province_id: &str) -> FetchOutcome<Vec<District>> {
        self.get_list(&urls::districts(province_id)).await
    }

    pub async fn municipalities(&self, district_id: &str) -> FetchOutcome<Vec<Municipality>> {
        self.get_list(&urls::municipalities(district_id)).await
    }

    pub async fn report(
        &self,
        report: ReportType,
        muni_code: &str,
    ) -> FetchOutcome<Vec<ReportRow>> {
        self.get_list(&urls::report(report, self.page, muni_code))
            .await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> FetchOutcome<Vec<T>> {
        let url = match urls::endpoint(&self.base, path) {
            Ok(u) => u,
            Err(e) => {
                warn!(path, error = %e, "invalid endpoint");
                return FetchOutcome::Failed(e.to_string());
            }
        };

        match self.get_json_core::<Vec<T>>(&url).await {
            Ok(items) if items.is_empty() => {
                debug!(%url, "empty result");
                FetchOutcome::Empty
            }
            Ok(items) => FetchOutcome::Data(items),
            Err(e) => {
                warn!(%url, error = %e, "fetch failed");
                FetchOutcome::Failed(format!("{:#}", e))
            }
        }
    }

    async fn get_json_core<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        debug!("Fetching JSON from {}", url);
        Ok(self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .json::<T>()
            .await
            .with_context(|| format!("Decoding JSON from {}", url))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_failed_collapse_to_nothing() {
        let empty: FetchOutcome<Vec<u8>> = FetchOutcome::Empty;
        let failed: FetchOutcome<Vec<u8>> = FetchOutcome::Failed("timeout".into());
        assert!(!empty.is_failed());
        assert!(failed.is_failed());
        assert!(empty.into_vec().is_empty());
        assert!(failed.into_vec().is_empty());
        assert_eq!(FetchOutcome::Data(vec![1u8]).into_vec(), vec![1]);
    }

    #[tokio::test]
    async fn unreachable_host_is_failed_not_error() {
        // Port 9 on localhost (discard) is closed in test environments.
        let client = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let catalog = CatalogClient::with_client(client, base, Page::default());
        assert!(catalog.provinces().await.is_failed());
    }
}
