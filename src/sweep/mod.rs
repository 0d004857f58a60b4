//! Sweep orchestration - probe many candidates through a bounded pool
//!
//! The orchestrator owns the [`ResultSet`]; worker tasks only compute private
//! [`ProbeResult`]s, which are folded in on the orchestrator side as they
//! settle. Individual probe failures never abort a sweep.

mod pool;
mod result_set;

pub use pool::{BoundedPool, PoolStats, TaskOutcome};
pub use result_set::ResultSet;

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::error::Result;
use crate::probe::{Probe, RdapProber};
use crate::rdap::EndpointTable;
use crate::types::{Candidate, ProbeConfig, ProbeResult, SweepConfig, Verdict};

/// Progress notifications emitted while a sweep runs
#[derive(Debug)]
pub enum SweepEvent<'a> {
    /// A probe finished with a verdict
    Checked(&'a ProbeResult),
    /// No verdict was collected for this candidate
    Skipped { candidate: &'a Candidate, reason: String },
}

/// Final outcome of a sweep, handed to the reporter
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Candidates submitted
    pub checked: usize,
    /// Available domains, sorted
    pub available: Vec<String>,
    pub unavailable: usize,
    pub indeterminate: usize,
    pub rate_limited: usize,
    /// Candidates whose probe timed out or crashed, sorted
    pub skipped: Vec<String>,
    pub elapsed_ms: u64,
}

impl SweepReport {
    pub fn available_count(&self) -> usize {
        self.available.len()
    }
}

/// Randomized pause applied while a worker still holds its slot
#[derive(Debug, Clone, Copy)]
struct Backoff {
    min: Duration,
    max: Duration,
    pace: bool,
}

impl Backoff {
    fn delay_for(&self, result: &ProbeResult) -> Option<Duration> {
        if !(self.pace || result.is_rate_limited()) || self.max.is_zero() {
            return None;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Some(Duration::from_millis(rand::thread_rng().gen_range(min..=max)))
    }
}

#[derive(Default)]
struct Tally {
    unavailable: usize,
    indeterminate: usize,
    rate_limited: usize,
    skipped: Vec<String>,
}

/// Runs a [`Probe`] over a candidate list with at most `workers` probes in flight
pub struct Sweeper<P> {
    probe: Arc<P>,
    config: SweepConfig,
}

impl<P: Probe + 'static> Sweeper<P> {
    pub fn new(probe: P, config: SweepConfig) -> Result<Self> {
        Self::from_arc(Arc::new(probe), config)
    }

    pub fn from_arc(probe: Arc<P>, config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { probe, config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub async fn run<I>(&self, candidates: I) -> Result<SweepReport>
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.run_with_observer(candidates, |_| {}).await
    }

    /// Run the sweep, calling `observer` for every settled candidate.
    pub async fn run_with_observer<I, O>(&self, candidates: I, mut observer: O) -> Result<SweepReport>
    where
        I: IntoIterator<Item = Candidate>,
        O: FnMut(&SweepEvent<'_>),
    {
        let start = Instant::now();
        let pool = BoundedPool::new(self.config.workers, self.config.task_timeout)?;
        let backoff = Backoff {
            min: self.config.backoff_min,
            max: self.config.backoff_max,
            pace: self.config.pace,
        };

        let results = ResultSet::new();
        let mut tally = Tally::default();
        let probe = Arc::clone(&self.probe);

        let stats = pool
            .run_with_cooldown(
                candidates,
                move |candidate: Candidate| {
                    let probe = Arc::clone(&probe);
                    async move { probe.probe(&candidate).await }
                },
                move |result: &ProbeResult| backoff.delay_for(result),
                |candidate, outcome| match outcome {
                    TaskOutcome::Completed(result) => {
                        match result.verdict {
                            Verdict::Available => {
                                results.record(&result);
                            }
                            Verdict::Unavailable => tally.unavailable += 1,
                            Verdict::Indeterminate => tally.indeterminate += 1,
                        }
                        if result.is_rate_limited() {
                            tally.rate_limited += 1;
                        }
                        observer(&SweepEvent::Checked(&result));
                    }
                    TaskOutcome::TimedOut => {
                        tracing::warn!(domain = %candidate, "Check timed out, skipping");
                        tally.skipped.push(candidate.to_string());
                        observer(&SweepEvent::Skipped {
                            candidate,
                            reason: "timed out".to_string(),
                        });
                    }
                    TaskOutcome::Failed(e) => {
                        tracing::error!(domain = %candidate, error = %e, "Check crashed, skipping");
                        tally.skipped.push(candidate.to_string());
                        observer(&SweepEvent::Skipped {
                            candidate,
                            reason: e,
                        });
                    }
                },
            )
            .await?;

        tally.skipped.sort_unstable();
        let report = SweepReport {
            checked: stats.submitted,
            available: results.finalize(),
            unavailable: tally.unavailable,
            indeterminate: tally.indeterminate,
            rate_limited: tally.rate_limited,
            skipped: tally.skipped,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            checked = report.checked,
            available = report.available_count(),
            indeterminate = report.indeterminate,
            skipped = report.skipped.len(),
            duration_ms = report.elapsed_ms,
            "Sweep completed"
        );

        Ok(report)
    }
}

impl Sweeper<RdapProber> {
    /// RDAP-backed sweeper over `endpoints`.
    ///
    /// A task timeout shorter than the request timeout is allowed but logged.
    pub fn rdap(probe_config: ProbeConfig, endpoints: EndpointTable, sweep_config: SweepConfig) -> Result<Self> {
        if sweep_config.task_timeout < probe_config.timeout {
            tracing::warn!(
                task_timeout_ms = %sweep_config.task_timeout.as_millis(),
                request_timeout_ms = %probe_config.timeout.as_millis(),
                "Task timeout is shorter than the request timeout; slow registries will be skipped"
            );
        }
        let prober = RdapProber::with_endpoints(probe_config, endpoints)?;
        Self::new(prober, sweep_config)
    }
}

/// Sweep `candidates` against the built-in RDAP endpoint table.
pub async fn sweep<I>(candidates: I, probe_config: ProbeConfig, sweep_config: SweepConfig) -> Result<SweepReport>
where
    I: IntoIterator<Item = Candidate>,
{
    Sweeper::rdap(probe_config, EndpointTable::default(), sweep_config)?
        .run(candidates)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProbeReason;
    use async_trait::async_trait;

    /// Answers from the candidate label: `free*` → available, `slow*` → after
    /// a label-dependent delay, `hang*` → never, `limit*` → 429, `crash*` → panic,
    /// anything else taken.
    struct ScriptedProbe;

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn probe(&self, candidate: &Candidate) -> ProbeResult {
            let label = candidate.label().to_string();
            if label.starts_with("hang") {
                std::future::pending::<()>().await;
            }
            if label.starts_with("crash") {
                panic!("check crashed on {}", candidate);
            }
            if let Some(n) = label.strip_prefix("slow") {
                let ms: u64 = n.parse().unwrap_or(1);
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            let (verdict, reason) = if label.starts_with("free") || label.starts_with("slow") {
                (Verdict::Available, None)
            } else if label.starts_with("limit") {
                (Verdict::Indeterminate, Some(ProbeReason::RateLimited))
            } else {
                (Verdict::Unavailable, None)
            };
            ProbeResult {
                candidate: candidate.clone(),
                verdict,
                reason,
                url: String::new(),
                elapsed: Duration::ZERO,
            }
        }
    }

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|n| Candidate::new(n)).collect()
    }

    #[test]
    fn test_backoff_only_after_rate_limit() {
        let backoff = Backoff {
            min: Duration::from_millis(100),
            max: Duration::from_millis(300),
            pace: false,
        };
        let mut result = ProbeResult {
            candidate: Candidate::new("x.com"),
            verdict: Verdict::Unavailable,
            reason: None,
            url: String::new(),
            elapsed: Duration::ZERO,
        };
        assert!(backoff.delay_for(&result).is_none());

        result.verdict = Verdict::Indeterminate;
        result.reason = Some(ProbeReason::RateLimited);
        let delay = backoff.delay_for(&result).unwrap();
        assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(300));

        let paced = Backoff { pace: true, ..backoff };
        result.reason = None;
        assert!(paced.delay_for(&result).is_some());
    }

    #[tokio::test]
    async fn test_report_is_sorted_regardless_of_completion_order() {
        let sweeper = Sweeper::new(
            ScriptedProbe,
            SweepConfig {
                workers: 8,
                ..Default::default()
            },
        )
        .unwrap();

        // Later-submitted names finish first.
        let report = sweeper
            .run(candidates(&["slow40.com", "slow30.ai", "slow20.dev", "slow10.com", "slow1.zz"]))
            .await
            .unwrap();

        assert_eq!(report.checked, 5);
        assert_eq!(
            report.available,
            vec!["slow1.zz", "slow10.com", "slow20.dev", "slow30.ai", "slow40.com"]
        );
    }

    #[tokio::test]
    async fn test_counts_by_verdict() {
        let sweeper = Sweeper::new(
            ScriptedProbe,
            SweepConfig {
                workers: 3,
                backoff_min: Duration::ZERO,
                backoff_max: Duration::from_millis(1),
                ..Default::default()
            },
        )
        .unwrap();

        let mut checked_events = 0;
        let report = sweeper
            .run_with_observer(
                candidates(&["freea.com", "taken.com", "limit.ai", "freeb.dev", "other.com"]),
                |event| {
                    if let SweepEvent::Checked(_) = event {
                        checked_events += 1;
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(checked_events, 5);
        assert_eq!(report.available, vec!["freea.com", "freeb.dev"]);
        assert_eq!(report.unavailable, 2);
        assert_eq!(report.indeterminate, 1);
        assert_eq!(report.rate_limited, 1);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_probe_is_skipped_within_task_timeout() {
        let task_timeout = Duration::from_secs(20);
        let sweeper = Sweeper::new(
            ScriptedProbe,
            SweepConfig {
                workers: 4,
                task_timeout,
                ..Default::default()
            },
        )
        .unwrap();

        let start = tokio::time::Instant::now();
        let mut skipped_events = Vec::new();
        let report = sweeper
            .run_with_observer(candidates(&["freea.com", "hang.com", "freeb.com"]), |event| {
                if let SweepEvent::Skipped { candidate, .. } = event {
                    skipped_events.push(candidate.to_string());
                }
            })
            .await
            .unwrap();

        assert!(start.elapsed() <= task_timeout + Duration::from_secs(1));
        assert_eq!(report.available, vec!["freea.com", "freeb.com"]);
        assert_eq!(report.skipped, vec!["hang.com"]);
        assert_eq!(skipped_events, vec!["hang.com"]);
    }

    #[tokio::test]
    async fn test_empty_sweep_still_reports() {
        let sweeper = Sweeper::new(ScriptedProbe, SweepConfig::default()).unwrap();
        let report = sweeper.run(Vec::new()).await.unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.available.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SweepConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(Sweeper::new(ScriptedProbe, config).is_err());
    }

    #[tokio::test]
    async fn test_sweep_with_no_candidates_reports_empty() {
        let report = sweep(Vec::new(), ProbeConfig::default(), SweepConfig::default())
            .await
            .unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.available.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_rejects_invalid_config() {
        let sweep_config = SweepConfig {
            workers: 0,
            ..Default::default()
        };
        let result = sweep(candidates(&["a.com"]), ProbeConfig::default(), sweep_config).await;
        assert!(matches!(result, Err(crate::SweepError::Config { .. })));

        let probe_config = ProbeConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        let result = sweep(candidates(&["a.com"]), probe_config, SweepConfig::default()).await;
        assert!(matches!(result, Err(crate::SweepError::Config { .. })));
    }

    #[test]
    fn test_rdap_sweeper_allows_short_task_timeout() {
        let sweeper = Sweeper::rdap(
            ProbeConfig::default(),
            EndpointTable::bootstrap_only(),
            SweepConfig {
                task_timeout: Duration::from_secs(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(sweeper.config().task_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_crashed_check_is_skipped_and_reported() {
        let sweeper = Sweeper::new(ScriptedProbe, SweepConfig::default()).unwrap();
        let report = sweeper
            .run(candidates(&["crash.com", "freea.com", "taken.com"]))
            .await
            .unwrap();

        assert_eq!(report.checked, 3);
        assert_eq!(report.available, vec!["freea.com"]);
        assert_eq!(report.skipped, vec!["crash.com"]);

        let text = crate::report::render_text(&report, "test", chrono::Utc::now());
        assert!(text.contains("Skipped 1 checks (timed out or failed).\n"));
    }
}
