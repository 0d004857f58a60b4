//! Core types and structures for domain-sweep

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::error::{Result, SweepError};

/// Outcome of a single availability probe.
///
/// `Indeterminate` covers every case where the registry did not give a usable
/// answer. Callers treat it exactly like `Unavailable`; it only exists so that
/// reports can tell "registered" apart from "could not tell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Available,
    Unavailable,
    Indeterminate,
}

impl Verdict {
    pub fn is_available(&self) -> bool {
        matches!(self, Verdict::Available)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Available => write!(f, "available"),
            Verdict::Unavailable => write!(f, "unavailable"),
            Verdict::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Diagnostic attached to a non-definitive verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeReason {
    /// The request did not finish within the per-request timeout
    Timeout,
    /// Connection, TLS, redirect or body transfer failure
    Network(String),
    /// HTTP 429
    RateLimited,
    /// Any status other than 200, 404 and 429
    UnexpectedStatus(u16),
    /// HTTP 200 whose body is not JSON
    MalformedBody,
}

impl fmt::Display for ProbeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeReason::Timeout => write!(f, "timeout"),
            ProbeReason::Network(msg) => write!(f, "network error: {}", msg),
            ProbeReason::RateLimited => write!(f, "rate limited"),
            ProbeReason::UnexpectedStatus(code) => write!(f, "unexpected status {}", code),
            ProbeReason::MalformedBody => write!(f, "non-JSON 200 response"),
        }
    }
}

/// A domain name to check, e.g. `apple.com`.
///
/// Stored trimmed and lower-cased. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(domain: impl AsRef<str>) -> Self {
        Self(domain.as_ref().trim().to_lowercase())
    }

    /// Everything before the last dot (`apple` for `apple.com`)
    pub fn label(&self) -> &str {
        match self.0.rfind('.') {
            Some(pos) => &self.0[..pos],
            None => &self.0,
        }
    }

    /// Top-level suffix (`com` for `apple.com`); empty when there is no dot
    pub fn suffix(&self) -> &str {
        match self.0.rfind('.') {
            Some(pos) => &self.0[pos + 1..],
            None => "",
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Result of checking one candidate
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub candidate: Candidate,
    pub verdict: Verdict,
    pub reason: Option<ProbeReason>,
    /// RDAP URL that was queried
    pub url: String,
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn is_available(&self) -> bool {
        self.verdict.is_available()
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self.reason, Some(ProbeReason::RateLimited))
    }
}

/// Configuration for a single RDAP request
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Upper bound for one request including redirects and body
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("domain-sweep/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(SweepError::config("request timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration for the bounded worker pool
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Maximum number of probes in flight
    pub workers: usize,
    /// How long the orchestrator waits for one probe once it holds a worker slot
    pub task_timeout: Duration,
    /// Lower bound of the randomized pause after a rate-limited probe
    pub backoff_min: Duration,
    /// Upper bound of the randomized pause after a rate-limited probe
    pub backoff_max: Duration,
    /// Pause (same window) after every probe, not only rate-limited ones
    pub pace: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            task_timeout: Duration::from_secs(30),
            backoff_min: Duration::from_millis(100),
            backoff_max: Duration::from_millis(300),
            pace: false,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SweepError::config("workers must be at least 1"));
        }
        if self.task_timeout.is_zero() {
            return Err(SweepError::config("task timeout must be greater than zero"));
        }
        if self.backoff_min > self.backoff_max {
            return Err(crate::config_error!(
                "backoff window is empty ({}ms > {}ms)",
                self.backoff_min.as_millis(),
                self.backoff_max.as_millis()
            ));
        }
        Ok(())
    }
}
