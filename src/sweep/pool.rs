//! Bounded concurrent task pool.
//!
//! One spawned task per item, at most `workers` of them doing work at any
//! time. Every item is submitted up front and queues on a semaphore. Each
//! task gets `task_timeout` once it holds a worker slot; when that expires
//! its future is dropped, which cancels whatever request it had in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};

use crate::error::{Result, SweepError};

/// How a single task settled
#[derive(Debug)]
pub enum TaskOutcome<V> {
    Completed(V),
    /// No result within the per-task timeout; never retried
    TimedOut,
    /// The task panicked
    Failed(String),
}

/// Counters for one pool run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub submitted: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
}

impl PoolStats {
    pub fn settled(&self) -> usize {
        self.completed + self.timed_out + self.failed
    }
}

/// Reusable bounded-concurrency pool with a per-task result timeout
#[derive(Debug, Clone)]
pub struct BoundedPool {
    workers: usize,
    task_timeout: Duration,
}

impl BoundedPool {
    pub fn new(workers: usize, task_timeout: Duration) -> Result<Self> {
        if workers == 0 {
            return Err(SweepError::config("pool needs at least one worker"));
        }
        if task_timeout.is_zero() {
            return Err(SweepError::config("task timeout must be greater than zero"));
        }
        Ok(Self {
            workers,
            task_timeout,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Run `task` over every item, handing each outcome to `on_outcome` as it
    /// settles. Outcomes arrive in completion order, not submission order.
    pub async fn run<I, T, V, F, Fut, C>(&self, items: I, task: F, on_outcome: C) -> Result<PoolStats>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
        V: Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = V> + Send + 'static,
        C: FnMut(&T, TaskOutcome<V>),
    {
        self.run_with_cooldown(items, task, |_: &V| None, on_outcome)
            .await
    }

    /// Like [`run`](Self::run), but after a task completes the worker slot is
    /// held for `cooldown(&value)` before the next queued task may use it.
    /// The cooldown is not counted against the task timeout.
    pub async fn run_with_cooldown<I, T, V, F, Fut, D, C>(
        &self,
        items: I,
        task: F,
        cooldown: D,
        mut on_outcome: C,
    ) -> Result<PoolStats>
    where
        I: IntoIterator<Item = T>,
        T: Clone,
        V: Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = V> + Send + 'static,
        D: Fn(&V) -> Option<Duration> + Send + Sync + 'static,
        C: FnMut(&T, TaskOutcome<V>),
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let cooldown = Arc::new(cooldown);
        let mut items_by_index = Vec::new();
        let mut pending = FuturesUnordered::new();

        for (index, item) in items.into_iter().enumerate() {
            let fut = task(item.clone());
            items_by_index.push(item);

            let semaphore = Arc::clone(&semaphore);
            let cooldown = Arc::clone(&cooldown);
            let task_timeout = self.task_timeout;

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let value = timeout(task_timeout, fut).await.ok();
                if let Some(pause) = value.as_ref().and_then(|v| (*cooldown)(v)) {
                    sleep(pause).await;
                }
                Ok::<_, tokio::sync::AcquireError>(value)
            });
            pending.push(async move { (index, handle.await) });
        }

        let mut stats = PoolStats {
            submitted: items_by_index.len(),
            ..Default::default()
        };
        tracing::debug!(
            submitted = stats.submitted,
            workers = self.workers,
            task_timeout_ms = %self.task_timeout.as_millis(),
            "Pool started"
        );

        while let Some((index, joined)) = pending.next().await {
            let item = &items_by_index[index];
            match joined {
                Ok(Ok(Some(value))) => {
                    stats.completed += 1;
                    on_outcome(item, TaskOutcome::Completed(value));
                }
                Ok(Ok(None)) => {
                    stats.timed_out += 1;
                    on_outcome(item, TaskOutcome::TimedOut);
                }
                Ok(Err(e)) => {
                    semaphore.close();
                    return Err(SweepError::submission(e.to_string()));
                }
                Err(e) => {
                    stats.failed += 1;
                    on_outcome(item, TaskOutcome::Failed(e.to_string()));
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rejects_zero_workers() {
        assert!(BoundedPool::new(0, Duration::from_secs(1)).is_err());
        assert!(BoundedPool::new(1, Duration::ZERO).is_err());
    }

    #[tokio::test]
    async fn test_every_item_settles_once() {
        let pool = BoundedPool::new(4, Duration::from_secs(5)).unwrap();
        let mut seen = Vec::new();

        let stats = pool
            .run(0..50u32, |n| async move { n * 2 }, |item, outcome| {
                if let TaskOutcome::Completed(v) = outcome {
                    assert_eq!(v, *item * 2);
                    seen.push(*item);
                }
            })
            .await
            .unwrap();

        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!(stats.submitted, 50);
        assert_eq!(stats.completed, 50);
        assert_eq!(stats.settled(), 50);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_workers() {
        let pool = BoundedPool::new(3, Duration::from_secs(5)).unwrap();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let stats = pool
            .run(
                0..30u32,
                |_| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    }
                },
                |_, _| {},
            )
            .await
            .unwrap();

        assert_eq!(stats.completed, 30);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_task_times_out_without_blocking_others() {
        let pool = BoundedPool::new(2, Duration::from_secs(20)).unwrap();
        let start = tokio::time::Instant::now();
        let mut timed_out = Vec::new();
        let mut done = Vec::new();

        let stats = pool
            .run(
                vec!["fast-a", "hang", "fast-b", "fast-c"],
                |name| async move {
                    if name == "hang" {
                        std::future::pending::<()>().await;
                    }
                    name
                },
                |item, outcome| match outcome {
                    TaskOutcome::Completed(v) => done.push(v),
                    TaskOutcome::TimedOut => timed_out.push(*item),
                    TaskOutcome::Failed(e) => panic!("unexpected failure: {}", e),
                },
            )
            .await
            .unwrap();

        assert_eq!(timed_out, vec!["hang"]);
        assert_eq!(done.len(), 3);
        assert_eq!(stats.timed_out, 1);
        assert!(start.elapsed() <= Duration::from_secs(21));
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported_as_failed() {
        let pool = BoundedPool::new(2, Duration::from_secs(5)).unwrap();
        let mut failed = Vec::new();

        let stats = pool
            .run(
                vec![1u32, 2, 3],
                |n| async move {
                    if n == 2 {
                        panic!("boom");
                    }
                    n
                },
                |item, outcome| {
                    if let TaskOutcome::Failed(_) = outcome {
                        failed.push(*item);
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(failed, vec![2]);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_holds_the_slot() {
        let pool = BoundedPool::new(1, Duration::from_secs(1)).unwrap();
        let start = tokio::time::Instant::now();

        pool.run_with_cooldown(
            vec![1u32, 2, 3],
            |n| async move { n },
            |_: &u32| Some(Duration::from_millis(200)),
            |_, _| {},
        )
        .await
        .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = BoundedPool::new(2, Duration::from_secs(1)).unwrap();
        let stats = pool
            .run(Vec::<u32>::new(), |n| async move { n }, |_, _| {})
            .await
            .unwrap();
        assert_eq!(stats, PoolStats::default());
    }
}
