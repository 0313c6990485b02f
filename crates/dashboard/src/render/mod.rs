//! Snapshot renderers. Each one fully rebuilds its region.

pub mod drives;
pub mod jobs;
pub mod system;
