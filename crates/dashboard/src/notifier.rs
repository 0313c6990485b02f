//! Transient operator notifications ("toasts").

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// A toast starts fading after this long.
pub const FADE_AFTER: Duration = Duration::from_secs(3);
/// A toast is removed after this long.
pub const REMOVE_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub posted_at: Instant,
}

impl Toast {
    /// `None` once the toast has expired.
    pub fn phase(&self, now: Instant) -> Option<Phase> {
        let age = now.saturating_duration_since(self.posted_at);
        if age >= REMOVE_AFTER {
            None
        } else if age >= FADE_AFTER {
            Some(Phase::Fading)
        } else {
            Some(Phase::Visible)
        }
    }
}

/// What changed during one [`Notifier::sweep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sweep {
    /// Toasts that entered [`Phase::Fading`] since the previous sweep.
    pub faded: usize,
    pub removed: usize,
}

/// FIFO toast stack. Unbounded, no deduplication.
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
    next_id: u64,
    /// Highest toast id already reported as fading.
    faded_through: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> Toast {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            message: message.into(),
            severity,
            posted_at: Instant::now(),
        };
        self.toasts.push_back(toast.clone());
        toast
    }

    /// Drop expired toasts. Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.phase(now).is_some());
        before - self.toasts.len()
    }

    /// Drop expired toasts and report the ones that started fading since the
    /// last sweep. Each toast is reported as fading at most once.
    pub fn sweep(&mut self, now: Instant) -> Sweep {
        let removed = self.prune(now);
        let newly_fading: Vec<u64> = self
            .toasts
            .iter()
            .filter(|t| t.id > self.faded_through && t.phase(now) == Some(Phase::Fading))
            .map(|t| t.id)
            .collect();
        if let Some(&last) = newly_fading.iter().max() {
            self.faded_through = last;
        }
        Sweep {
            faded: newly_fading.len(),
            removed,
        }
    }

    /// Live toasts in posting order, with their phase.
    pub fn visible(&self, now: Instant) -> Vec<(&Toast, Phase)> {
        self.toasts
            .iter()
            .filter_map(|t| t.phase(now).map(|p| (t, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toasts_fade_then_expire() {
        let mut n = Notifier::new();
        n.notify("Drive ejected successfully.", Severity::Success);

        assert_eq!(n.visible(Instant::now())[0].1, Phase::Visible);

        tokio::time::advance(Duration::from_millis(3000)).await;
        assert_eq!(n.visible(Instant::now())[0].1, Phase::Fading);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert_eq!(n.prune(Instant::now()), 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(n.visible(Instant::now()).is_empty());
        assert_eq!(n.prune(Instant::now()), 1);
        assert!(n.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_reports_each_fade_once() {
        let mut n = Notifier::new();
        n.notify("Job cancelled", Severity::Success);
        tokio::time::advance(Duration::from_secs(1)).await;
        n.notify("Eject failed!", Severity::Error);

        assert_eq!(n.sweep(Instant::now()), Sweep::default());

        tokio::time::advance(Duration::from_millis(2500)).await;
        assert_eq!(n.sweep(Instant::now()), Sweep { faded: 1, removed: 0 });
        assert_eq!(n.sweep(Instant::now()), Sweep::default());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(n.sweep(Instant::now()), Sweep { faded: 1, removed: 1 });

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(n.sweep(Instant::now()), Sweep { faded: 0, removed: 1 });
        assert!(n.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_stack_in_order_without_dedup() {
        let mut n = Notifier::new();
        n.notify("Eject failed!", Severity::Error);
        tokio::time::advance(Duration::from_secs(2)).await;
        n.notify("Eject failed!", Severity::Error);
        n.notify("Job cancelled", Severity::Success);

        let now = Instant::now();
        let messages: Vec<_> = n.visible(now).iter().map(|(t, _)| t.message.clone()).collect();
        assert_eq!(messages, vec!["Eject failed!", "Eject failed!", "Job cancelled"]);

        tokio::time::advance(Duration::from_secs(2)).await;
        n.prune(Instant::now());
        assert_eq!(n.len(), 2);
        let ids: Vec<_> = n.visible(Instant::now()).iter().map(|(t, _)| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
