//! RDAP-backed prober

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect, Client};
use tokio::time::timeout;

use super::Probe;
use crate::error::Result;
use crate::rdap::{classify, Classification, EndpointTable};
use crate::types::{Candidate, ProbeConfig, ProbeReason, ProbeResult, Verdict};

const RDAP_ACCEPT: &str = "application/rdap+json, application/json";

/// Issues one GET per candidate against its registry and classifies the answer
#[derive(Clone)]
pub struct RdapProber {
    client: Client,
    endpoints: EndpointTable,
    config: ProbeConfig,
}

impl RdapProber {
    /// Create a prober using the built-in endpoint table
    pub fn new(config: ProbeConfig) -> Result<Self> {
        Self::with_endpoints(config, EndpointTable::default())
    }

    /// Create a prober with a custom endpoint table
    pub fn with_endpoints(config: ProbeConfig, endpoints: EndpointTable) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(RDAP_ACCEPT));

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoints,
            config,
        })
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Query `url` for `candidate` and classify the response.
    pub async fn check_url(&self, candidate: &Candidate, url: &str) -> ProbeResult {
        let start = Instant::now();

        let classification = match timeout(self.config.timeout, self.fetch(url)).await {
            Ok(Ok((status, body))) => classify(status, &body),
            Ok(Err(e)) if e.is_timeout() => Classification::indeterminate(ProbeReason::Timeout),
            Ok(Err(e)) => Classification::indeterminate(ProbeReason::Network(e.to_string())),
            Err(_) => Classification::indeterminate(ProbeReason::Timeout),
        };

        let elapsed = start.elapsed();
        log_classification(candidate, &classification, elapsed.as_millis());

        ProbeResult {
            candidate: candidate.clone(),
            verdict: classification.verdict,
            reason: classification.reason,
            url: url.to_string(),
            elapsed,
        }
    }

    /// GET `url`; the body is only read for 200 responses, nothing else inspects it.
    async fn fetch(&self, url: &str) -> reqwest::Result<(u16, Vec<u8>)> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Ok((status, Vec::new()));
        }
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl Probe for RdapProber {
    async fn probe(&self, candidate: &Candidate) -> ProbeResult {
        let url = self.endpoints.resolve(candidate.as_str());
        self.check_url(candidate, &url).await
    }
}

fn log_classification(candidate: &Candidate, classification: &Classification, elapsed_ms: u128) {
    match (&classification.verdict, &classification.reason) {
        (Verdict::Available, _) => {
            tracing::info!(domain = %candidate, duration_ms = %elapsed_ms, "Domain available");
        }
        (_, Some(ProbeReason::RateLimited)) => {
            tracing::warn!(domain = %candidate, "Rate limited, consider reducing workers");
        }
        (_, Some(ProbeReason::UnexpectedStatus(status))) => {
            tracing::warn!(domain = %candidate, status = *status, "Unexpected status code");
        }
        (_, Some(reason)) => {
            tracing::debug!(domain = %candidate, reason = %reason, duration_ms = %elapsed_ms, "Check inconclusive");
        }
        (_, None) => {
            tracing::trace!(domain = %candidate, duration_ms = %elapsed_ms, "Domain registered");
        }
    }
}
