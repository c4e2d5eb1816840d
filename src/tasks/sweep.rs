//! Expiry Sweep Tasks
//!
//! Background tasks that periodically reclaim memory held by expired cache
//! entries and idle rate-limit keys. Reads stay correct without them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::ExpiringCache;
use crate::limiter::SlidingWindowLimiter;

/// Shortest period a sweep will run at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

// == Sweep Trait ==
/// A shared table that can drop its stale contents in one pass.
pub trait Sweep: Send + Sync + 'static {
    /// Name used in log lines.
    const NAME: &'static str;

    /// Removes stale contents and returns how many keys were dropped.
    fn sweep(&self) -> usize;
}

impl Sweep for ExpiringCache {
    const NAME: &'static str = "cache";

    fn sweep(&self) -> usize {
        self.purge_expired()
    }
}

impl Sweep for SlidingWindowLimiter {
    const NAME: &'static str = "rate limiter";

    fn sweep(&self) -> usize {
        self.purge_stale()
    }
}

/// Spawns a background task that sweeps `target` every `period`.
///
/// The first sweep runs one full period after spawning. The task exits as
/// soon as `shutdown` is cancelled.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(300), token.clone());
/// // Later, during shutdown:
/// token.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweep_task<S: Sweep>(
    target: Arc<S>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = period.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!(target_table = S::NAME, ?period, "Starting sweep task");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let removed = target.sweep();
            if removed > 0 {
                info!(target_table = S::NAME, removed, "Sweep removed stale keys");
            } else {
                debug!(target_table = S::NAME, "Sweep found nothing to remove");
            }
        }

        info!(target_table = S::NAME, "Sweep task stopped");
    })
}

// == Sweep Handle ==
/// Owns the cache and limiter sweep tasks and their shared shutdown signal.
///
/// Dropping the handle cancels the tasks without waiting for them.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl SweepHandle {
    /// Starts one sweep task for the cache and one for the limiter.
    pub fn spawn(
        cache: Arc<ExpiringCache>,
        cache_interval: Duration,
        limiter: Arc<SlidingWindowLimiter>,
        limiter_interval: Duration,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let tasks = vec![
            spawn_sweep_task(cache, cache_interval, shutdown.child_token()),
            spawn_sweep_task(limiter, limiter_interval, shutdown.child_token()),
        ];
        Self { shutdown, tasks }
    }

    /// A token that is cancelled when the sweeps are told to stop.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Signals every task to stop and waits for them to finish.
    ///
    /// Returns how many tasks ended by panicking or being aborted.
    pub async fn shutdown(mut self) -> usize {
        self.shutdown.cancel();
        let mut failed = 0;
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                warn!(error = %e, "Sweep task did not exit cleanly");
                failed += 1;
            }
        }
        failed
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
