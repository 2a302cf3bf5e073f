// src/ecfr/client.rs
//! Upstream access to the public eCFR API.
//!
//! The analyzer talks to upstream through the [`RegulationSource`] trait so
//! tests can substitute canned responses; [`EcfrClient`] is the real
//! reqwest-backed implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::de::DeserializeOwned;

use super::types::{AgenciesResponse, CorrectionsResponse, StructureNode, TitlesResponse};

pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov/api";

// The eCFR API rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Read access to the regulation data provider.
#[async_trait]
pub trait RegulationSource: Send + Sync {
    async fn fetch_titles(&self) -> Result<TitlesResponse>;
    async fn fetch_structure(&self, date: &str, title: u32) -> Result<StructureNode>;
    async fn fetch_corrections(&self, title: u32) -> Result<CorrectionsResponse>;
    async fn fetch_agencies(&self) -> Result<AgenciesResponse>;
}

pub struct EcfrClient {
    base_url: String,
    client: reqwest::Client,
}

impl EcfrClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("building ecfr http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let resp = match self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, %url, "ecfr http error");
                counter!("ecfr_fetch_errors_total").increment(1);
                return Err(e).context("ecfr http get()");
            }
        };

        let resp = resp.error_for_status().map_err(|e| {
            counter!("ecfr_fetch_errors_total").increment(1);
            anyhow::Error::from(e).context(format!("ecfr error status for {url}"))
        })?;

        counter!("ecfr_fetch_total").increment(1);
        resp.json::<T>()
            .await
            .with_context(|| format!("decoding ecfr json from {url}"))
    }
}

#[async_trait]
impl RegulationSource for EcfrClient {
    async fn fetch_titles(&self) -> Result<TitlesResponse> {
        self.get_json("versioner/v1/titles.json").await
    }

    async fn fetch_structure(&self, date: &str, title: u32) -> Result<StructureNode> {
        self.get_json(&format!("versioner/v1/structure/{date}/title-{title}.json"))
            .await
    }

    async fn fetch_corrections(&self, title: u32) -> Result<CorrectionsResponse> {
        self.get_json(&format!("admin/v1/corrections/title/{title}.json"))
            .await
    }

    async fn fetch_agencies(&self) -> Result<AgenciesResponse> {
        self.get_json("admin/v1/agencies.json").await
    }
}
