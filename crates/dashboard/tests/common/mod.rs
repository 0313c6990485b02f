#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use ripdash_client::{Backend, ClientError};
use ripdash_core::{DiscKind, DriveSnapshot, JobSnapshot, JobStatus, SystemSnapshot, Tier};
use ripdash_dashboard::Confirm;
use tokio::sync::oneshot;

/// In-memory backend that records every call in order.
#[derive(Default)]
pub struct FakeBackend {
    pub drives: Mutex<Vec<DriveSnapshot>>,
    pub jobs: Mutex<Vec<JobSnapshot>>,
    pub system: Mutex<SystemSnapshot>,
    pub fail_reads: AtomicBool,
    pub fail_mutations: AtomicBool,
    calls: Mutex<Vec<String>>,
    drive_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub fn with_drives(drives: Vec<DriveSnapshot>) -> Self {
        let backend = Self::default();
        *backend.drives.lock().unwrap() = drives;
        backend
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    /// The next `drives()` call blocks until the returned sender fires.
    pub fn gate_next_drives(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.drive_gates.lock().unwrap().push_back(rx);
        tx
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn read_error(&self) -> Option<ClientError> {
        self.fail_reads
            .load(Ordering::SeqCst)
            .then(|| ClientError::Network("connection refused".into()))
    }

    fn mutation_error(&self) -> Option<ClientError> {
        self.fail_mutations
            .load(Ordering::SeqCst)
            .then(|| ClientError::Status {
                status: 500,
                detail: Some("Eject failed: exit status 1".into()),
            })
    }
}

#[async_trait::async_trait]
impl Backend for FakeBackend {
    async fn system_info(&self) -> Result<SystemSnapshot, ClientError> {
        self.record("GET system-info");
        match self.read_error() {
            Some(e) => Err(e),
            None => Ok(self.system.lock().unwrap().clone()),
        }
    }

    async fn drives(&self) -> Result<Vec<DriveSnapshot>, ClientError> {
        self.record("GET drives");
        let snapshot = self.drives.lock().unwrap().clone();
        let gate = self.drive_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match self.read_error() {
            Some(e) => Err(e),
            None => Ok(snapshot),
        }
    }

    async fn jobs(&self) -> Result<Vec<JobSnapshot>, ClientError> {
        self.record("GET jobs");
        match self.read_error() {
            Some(e) => Err(e),
            None => Ok(self.jobs.lock().unwrap().clone()),
        }
    }

    async fn eject(&self, path: &str) -> Result<(), ClientError> {
        self.record(format!("POST eject {path}"));
        match self.mutation_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn cancel_job(&self, job_id: &str) -> Result<(), ClientError> {
        self.record(format!("POST cancel {job_id}"));
        match self.mutation_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Confirmer with a fixed answer that remembers what it was asked.
pub struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

pub fn drive(path: &str, caps: &[Tier]) -> DriveSnapshot {
    DriveSnapshot {
        path: path.into(),
        model: format!("Model {path}"),
        capability: caps.iter().copied().map(DiscKind::from).collect(),
        job_id: None,
        blacklisted: false,
        disc_label: None,
    }
}

pub fn busy_drive(path: &str, caps: &[Tier], job_id: &str) -> DriveSnapshot {
    DriveSnapshot {
        job_id: Some(job_id.into()),
        disc_label: Some("HEAT".into()),
        ..drive(path, caps)
    }
}

pub fn running_job(job_id: &str, drive: &str) -> JobSnapshot {
    JobSnapshot {
        job_id: job_id.into(),
        disc_label: "HEAT".into(),
        disc_type: DiscKind::Tier(Tier::Bluray),
        status: JobStatus::Running,
        progress: 12.0,
        drive: drive.into(),
        step: None,
        steps_total: None,
        step_description: None,
    }
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
