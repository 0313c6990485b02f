pub mod capability;
pub mod error;
pub mod types;

pub use capability::{CapabilitySummary, TierAvailability, classify, select_for_type};
pub use types::{DiscKind, DriveSnapshot, JobSnapshot, JobStatus, SystemSnapshot, Tier};
