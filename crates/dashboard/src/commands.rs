//! Operator mutations: eject a drive, cancel a job, eject the best drive for a tier.

use ripdash_client::ClientError;
use ripdash_core::{Tier, select_for_type};
use thiserror::Error;
use tracing::{info, warn};

use crate::dashboard::Dashboard;
use crate::notifier::Severity;

pub const EJECT_WITH_JOB_PROMPT: &str =
    "Are you sure you want to eject the drive? This will cancel the job!";
pub const CANCEL_JOB_PROMPT: &str = "Cancel this job?";

/// Asks the operator to approve a destructive action.
#[async_trait::async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmer that answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait::async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("declined by operator")]
    Declined,
    #[error("no available drive can handle {0}")]
    NoDriveAvailable(Tier),
    #[error("could not load drives: {0}")]
    DrivesUnavailable(ClientError),
    #[error(transparent)]
    Backend(#[from] ClientError),
}

impl CommandError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Declined => "declined",
            Self::NoDriveAvailable(_) => "no_drive_available",
            Self::DrivesUnavailable(_) => "drives_unavailable",
            Self::Backend(_) => "backend",
        }
    }
}

impl Dashboard {
    /// Eject `path`. A drive with an active job needs operator confirmation first,
    /// since the backend cancels the job as part of the eject.
    pub async fn eject(
        &self,
        path: &str,
        requires_confirmation: bool,
        confirm: &dyn Confirm,
    ) -> Result<(), CommandError> {
        if requires_confirmation && !confirm.confirm(EJECT_WITH_JOB_PROMPT).await {
            info!(path, "eject declined");
            return Err(CommandError::Declined);
        }

        match self.backend.eject(path).await {
            Ok(()) => {
                info!(path, "drive ejected");
                self.notify("Drive ejected successfully.", Severity::Success)
                    .await;
                self.refresh_drives().await;
                self.refresh_jobs().await;
                Ok(())
            }
            Err(e) => {
                warn!(path, error = %e, "eject failed");
                self.notify("Eject failed!", Severity::Error).await;
                Err(e.into())
            }
        }
    }

    /// Cancel a job. Always asks for confirmation.
    pub async fn cancel_job(
        &self,
        job_id: &str,
        confirm: &dyn Confirm,
    ) -> Result<(), CommandError> {
        if !confirm.confirm(CANCEL_JOB_PROMPT).await {
            info!(job_id, "cancel declined");
            return Err(CommandError::Declined);
        }

        match self.backend.cancel_job(job_id).await {
            Ok(()) => {
                info!(job_id, "job cancelled");
                self.notify("Job cancelled", Severity::Success).await;
                self.refresh_jobs().await;
                self.refresh_drives().await;
                Ok(())
            }
            Err(e) => {
                warn!(job_id, error = %e, "cancel failed");
                self.notify("Cancel failed!", Severity::Error).await;
                Err(e.into())
            }
        }
    }

    /// Eject the best idle drive for `tier` so the operator can insert a disc.
    /// Works from a fresh drive list, not the rendered one. Selection only
    /// considers idle drives, so no confirmation is needed.
    pub async fn eject_for_type(&self, tier: Tier) -> Result<(), CommandError> {
        let drives = match self.backend.drives().await {
            Ok(drives) => drives,
            Err(e) => {
                warn!(%tier, error = %e, "could not load drives for rip request");
                self.notify("Could not load drives", Severity::Error).await;
                return Err(CommandError::DrivesUnavailable(e));
            }
        };

        let Some(drive) = select_for_type(&drives, tier) else {
            info!(%tier, "no drive available for rip request");
            self.notify(format!("No available drive can handle {tier}"), Severity::Error)
                .await;
            return Err(CommandError::NoDriveAvailable(tier));
        };

        info!(%tier, path = %drive.path, "selected drive for rip request");
        self.eject(&drive.path, false, &AutoConfirm(true)).await
    }
}
