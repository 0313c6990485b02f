//! Dashboard state: the three regions, the notifier, and the refresh cycles
//! that keep the regions in step with the backend.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ripdash_client::{Backend, ClientError};
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tracing::debug;

use crate::notifier::{Notifier, Phase, Severity, Sweep, Toast};
use crate::render;
use crate::view::{Region, Resource};

/// Events published whenever something visible changes.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    RegionUpdated(Resource),
    Notified(Toast),
    ToastsFading,
    ToastsExpired,
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The snapshot replaced the region.
    Applied,
    /// A newer cycle for the same resource was issued while this one was in flight.
    Superseded,
    /// The fetch failed; the previous rendering stays in place.
    Failed,
}

/// Monotonic ticket counter for one resource's refresh cycles.
#[derive(Debug, Default)]
pub struct RefreshSequence {
    issued: AtomicU64,
}

impl RefreshSequence {
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}

#[derive(Debug, Default)]
struct Sequences {
    system: RefreshSequence,
    drives: RefreshSequence,
    jobs: RefreshSequence,
}

impl Sequences {
    fn get(&self, resource: Resource) -> &RefreshSequence {
        match resource {
            Resource::SystemInfo => &self.system,
            Resource::Drives => &self.drives,
            Resource::Jobs => &self.jobs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub system: Region,
    pub drives: Region,
    pub jobs: Region,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            system: Region::new(Resource::SystemInfo),
            drives: Region::new(Resource::Drives),
            jobs: Region::new(Resource::Jobs),
        }
    }
}

impl DashboardView {
    pub fn region(&self, resource: Resource) -> &Region {
        match resource {
            Resource::SystemInfo => &self.system,
            Resource::Drives => &self.drives,
            Resource::Jobs => &self.jobs,
        }
    }

    fn region_mut(&mut self, resource: Resource) -> &mut Region {
        match resource {
            Resource::SystemInfo => &mut self.system,
            Resource::Drives => &mut self.drives,
            Resource::Jobs => &mut self.jobs,
        }
    }
}

pub struct Dashboard {
    pub(crate) backend: Arc<dyn Backend>,
    view: Mutex<DashboardView>,
    notifier: Mutex<Notifier>,
    sequences: Sequences,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            backend,
            view: Mutex::new(DashboardView::default()),
            notifier: Mutex::new(Notifier::new()),
            sequences: Sequences::default(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Copy of the current view.
    pub async fn view(&self) -> DashboardView {
        self.view.lock().await.clone()
    }

    pub async fn notify(&self, message: impl Into<String>, severity: Severity) {
        let toast = self.notifier.lock().await.notify(message, severity);
        let _ = self.events.send(DashboardEvent::Notified(toast));
    }

    /// Live toasts with their phase.
    pub async fn toasts(&self) -> Vec<(Toast, Phase)> {
        let notifier = self.notifier.lock().await;
        notifier
            .visible(Instant::now())
            .into_iter()
            .map(|(t, p)| (t.clone(), p))
            .collect()
    }

    /// Remove expired toasts and publish an event for every visible change:
    /// toasts that started fading and toasts that were removed.
    pub async fn sweep_toasts(&self) -> Sweep {
        let sweep = self.notifier.lock().await.sweep(Instant::now());
        if sweep.faded > 0 {
            let _ = self.events.send(DashboardEvent::ToastsFading);
        }
        if sweep.removed > 0 {
            let _ = self.events.send(DashboardEvent::ToastsExpired);
        }
        sweep
    }

    pub async fn refresh(&self, resource: Resource) -> RefreshOutcome {
        match resource {
            Resource::SystemInfo => self.refresh_system_info().await,
            Resource::Drives => self.refresh_drives().await,
            Resource::Jobs => self.refresh_jobs().await,
        }
    }

    pub async fn refresh_all(&self) {
        for resource in Resource::ALL {
            self.refresh(resource).await;
        }
    }

    pub async fn refresh_system_info(&self) -> RefreshOutcome {
        self.run_cycle(Resource::SystemInfo, self.backend.system_info(), |region, snap| {
            render::system::render(region, snap)
        })
        .await
    }

    pub async fn refresh_drives(&self) -> RefreshOutcome {
        self.run_cycle(Resource::Drives, self.backend.drives(), |region, drives| {
            render::drives::render(region, drives)
        })
        .await
    }

    pub async fn refresh_jobs(&self) -> RefreshOutcome {
        self.run_cycle(Resource::Jobs, self.backend.jobs(), |region, jobs| {
            render::jobs::render(region, jobs)
        })
        .await
    }

    /// One fetch-and-render pass. The ticket is taken before the fetch starts;
    /// the result is rendered only if no newer ticket exists by the time it arrives.
    async fn run_cycle<T, F, R>(&self, resource: Resource, fetch: F, render: R) -> RefreshOutcome
    where
        F: Future<Output = Result<T, ClientError>>,
        R: FnOnce(&mut Region, &T),
    {
        let sequence = self.sequences.get(resource);
        let ticket = sequence.issue();

        let snapshot = match fetch.await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(%resource, ticket, error = %e, "refresh failed, keeping previous view");
                return RefreshOutcome::Failed;
            }
        };

        {
            let mut view = self.view.lock().await;
            if !sequence.is_latest(ticket) {
                debug!(%resource, ticket, "discarding superseded snapshot");
                return RefreshOutcome::Superseded;
            }
            render(view.region_mut(resource), &snapshot);
        }
        let _ = self.events.send(DashboardEvent::RegionUpdated(resource));
        RefreshOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_tracks_latest_ticket() {
        let seq = RefreshSequence::default();
        let a = seq.issue();
        let b = seq.issue();
        assert!(b > a);
        assert!(!seq.is_latest(a));
        assert!(seq.is_latest(b));
    }
}
