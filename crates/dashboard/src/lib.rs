pub mod commands;
pub mod dashboard;
pub mod notifier;
pub mod render;
pub mod scheduler;
pub mod theme;
pub mod view;

pub use commands::{AutoConfirm, CommandError, Confirm};
pub use dashboard::{Dashboard, DashboardEvent, DashboardView, RefreshOutcome};
pub use notifier::{Phase, Severity, Sweep, Toast};
pub use scheduler::{RefreshIntervals, RefreshScheduler};
pub use view::{Action, Region, Resource};
