//! Periodic refresh of the three resources.
//!
//! Each resource gets its own task and interval, so a slow system-info fetch
//! never delays drive or job polling. The first tick of every interval fires
//! immediately, which gives each resource its startup refresh independently.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::view::Resource;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
const TOAST_SWEEP_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub system_info: Duration,
    pub drives: Duration,
    pub jobs: Duration,
}

impl RefreshIntervals {
    pub fn uniform(every: Duration) -> Self {
        Self {
            system_info: every,
            drives: every,
            jobs: every,
        }
    }

    pub fn get(&self, resource: Resource) -> Duration {
        match resource {
            Resource::SystemInfo => self.system_info,
            Resource::Drives => self.drives,
            Resource::Jobs => self.jobs,
        }
    }
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self::uniform(DEFAULT_INTERVAL)
    }
}

/// Owns the polling tasks. Dropping it stops them; [`RefreshScheduler::shutdown`]
/// also waits for them to finish.
pub struct RefreshScheduler {
    dashboard: Arc<Dashboard>,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn start(dashboard: Arc<Dashboard>, intervals: RefreshIntervals) -> Self {
        let token = CancellationToken::new();
        let mut tasks: Vec<JoinHandle<()>> = Resource::ALL
            .into_iter()
            .map(|resource| {
                tokio::spawn(poll_resource(
                    dashboard.clone(),
                    resource,
                    intervals.get(resource),
                    token.clone(),
                ))
            })
            .collect();
        tasks.push(tokio::spawn(sweep_toasts(dashboard.clone(), token.clone())));

        info!(?intervals, "refresh scheduler started");
        Self {
            dashboard,
            token,
            tasks,
        }
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    /// Refresh `resource` now, outside its timer.
    pub async fn trigger(&self, resource: Resource) {
        self.dashboard.refresh(resource).await;
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub async fn shutdown(mut self) {
        self.token.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        info!("refresh scheduler stopped");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn poll_resource(
    dashboard: Arc<Dashboard>,
    resource: Resource,
    every: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                // A cycle in flight at shutdown is abandoned rather than awaited.
                tokio::select! {
                    _ = token.cancelled() => break,
                    outcome = dashboard.refresh(resource) => {
                        debug!(%resource, ?outcome, "poll cycle finished");
                    }
                }
            }
        }
    }
}

async fn sweep_toasts(dashboard: Arc<Dashboard>, token: CancellationToken) {
    let mut ticker = tokio::time::interval(TOAST_SWEEP_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                dashboard.sweep_toasts().await;
            }
        }
    }
}
