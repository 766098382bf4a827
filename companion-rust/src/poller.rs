use crate::ConfigError;
use std::{future::Future, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// A fixed-interval background task with an explicit on/off switch.
///
/// The first run happens one interval after spawning (or after being
/// re-enabled). Runs never overlap: the next tick is scheduled after the
/// previous run finishes. Cancelling, or dropping the poller, aborts the
/// task.
pub struct Poller {
    interval: Duration,
    enabled: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Spawn the polling task on the current tokio runtime. A zero
    /// `interval` is rejected.
    pub fn spawn<F, Fut>(
        interval: Duration,
        enabled: bool,
        mut task: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                name: "poll_interval",
            });
        }

        let (enabled_tx, mut enabled_rx) = watch::channel(enabled);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let is_enabled = *enabled_rx.borrow_and_update();
                if !is_enabled {
                    if enabled_rx.wait_for(|enabled| *enabled).await.is_err() {
                        break;
                    }
                    ticker.reset();
                    continue;
                }

                debug!(?interval, "poll tick");
                task().await;
            }
        });

        Ok(Self {
            interval,
            enabled: enabled_tx,
            handle,
        })
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn enable(&self) {
        self.enabled.send_replace(true);
    }

    /// Pause polling. A run already in progress finishes.
    pub fn disable(&self) {
        self.enabled.send_replace(false);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
