use async_trait::async_trait;
use std::future::Future;
use tokio::time::Duration;

/// Waits between cycles; injectable so the loop can run without wall-clock waits
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Delay backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Repeats a task forever with a fixed pause after each run
///
/// The pause is measured from the end of one run to the start of the next, so a
/// slow cycle pushes the following one back instead of overlapping it.
pub struct Scheduler<D> {
    interval: Duration,
    delay: D,
}

impl<D: Delay> Scheduler<D> {
    pub fn new(interval: Duration, delay: D) -> Self {
        Self { interval, delay }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `cycle` until `max_cycles` runs have completed, or forever when `None`
    ///
    /// No pause follows the final run of a bounded loop. Returns the number of
    /// completed runs.
    pub async fn run<F, Fut>(&self, mut cycle: F, max_cycles: Option<u64>) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future,
    {
        let mut completed = 0u64;

        loop {
            cycle().await;
            completed += 1;

            if max_cycles.is_some_and(|max| completed >= max) {
                return completed;
            }

            tracing::debug!("Idle for {:?} before next cycle", self.interval);
            self.delay.wait(self.interval).await;
        }
    }
}
