use ripdash_core::{DriveSnapshot, JobSnapshot, SystemSnapshot};

use crate::ClientError;

/// The ripping backend as seen by the dashboard.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/system-info`
    async fn system_info(&self) -> Result<SystemSnapshot, ClientError>;

    /// `GET /api/drives`
    async fn drives(&self) -> Result<Vec<DriveSnapshot>, ClientError>;

    /// `GET /api/jobs`
    async fn jobs(&self) -> Result<Vec<JobSnapshot>, ClientError>;

    /// `POST /api/drives/eject` with `{ "path": … }`. Cancels the drive's job server-side.
    async fn eject(&self, path: &str) -> Result<(), ClientError>;

    /// `POST /api/jobs/{id}/cancel`
    async fn cancel_job(&self, job_id: &str) -> Result<(), ClientError>;
}
