use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseTierError;

/// Optical media tier, ordered by read/write capability strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "DVD")]
    Dvd,
    #[serde(rename = "BLURAY")]
    Bluray,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Cd, Tier::Dvd, Tier::Bluray];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cd => "CD",
            Self::Dvd => "DVD",
            Self::Bluray => "BLURAY",
        }
    }

    /// Short label used in the overview tile.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::Cd => "CD",
            Self::Dvd => "DVD",
            Self::Bluray => "BD",
        }
    }

    /// Position in the CD < DVD < BLURAY ordering.
    pub fn rank(self) -> u8 {
        match self {
            Self::Cd => 0,
            Self::Dvd => 1,
            Self::Bluray => 2,
        }
    }

    /// A drive with this native tier can serve requests of `request` tier.
    pub fn serves(self, request: Tier) -> bool {
        self >= request
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CD" => Ok(Self::Cd),
            "DVD" => Ok(Self::Dvd),
            "BLURAY" | "BLU-RAY" | "BD" => Ok(Self::Bluray),
            _ => Err(ParseTierError(s.to_string())),
        }
    }
}

/// A disc kind as reported by the backend: one of the known tiers, or a raw
/// label the dashboard does not classify (the backend registers untracked
/// drives with `"Unknown"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscKind {
    Tier(Tier),
    Other(String),
}

impl DiscKind {
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Tier(t) => Some(*t),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Tier(t) => t.as_str(),
            Self::Other(s) => s,
        }
    }
}

impl From<Tier> for DiscKind {
    fn from(t: Tier) -> Self {
        Self::Tier(t)
    }
}

impl From<String> for DiscKind {
    fn from(s: String) -> Self {
        // Exact wire names only; aliases are accepted from operators, not the backend.
        match s.as_str() {
            "CD" => Self::Tier(Tier::Cd),
            "DVD" => Self::Tier(Tier::Dvd),
            "BLURAY" => Self::Tier(Tier::Bluray),
            _ => Self::Other(s),
        }
    }
}

impl From<DiscKind> for String {
    fn from(k: DiscKind) -> Self {
        match k {
            DiscKind::Tier(t) => t.as_str().to_string(),
            DiscKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for DiscKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical drive as returned by `GET /api/drives`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveSnapshot {
    pub path: String,
    pub model: String,
    /// Native capabilities, not inherited coverage.
    #[serde(default)]
    pub capability: Vec<DiscKind>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub blacklisted: bool,
    #[serde(default)]
    pub disc_label: Option<String>,
}

impl DriveSnapshot {
    /// Idle and not blacklisted.
    pub fn is_available(&self) -> bool {
        self.job_id.is_none() && !self.blacklisted
    }

    pub fn native_tiers(&self) -> impl Iterator<Item = Tier> + '_ {
        self.capability.iter().filter_map(DiscKind::tier)
    }

    pub fn has_native(&self, tier: Tier) -> bool {
        self.native_tiers().any(|t| t == tier)
    }
}

/// Job status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Finished,
    Failed,
    Cancelled,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "Queued",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Finished => "Finished",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s,
        }
    }

    /// Only jobs that have not reached a terminal state can be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Running | Self::Queued)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Queued" => Self::Queued,
            "Running" => Self::Running,
            "Completed" => Self::Completed,
            "Finished" => Self::Finished,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(s: JobStatus) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rip job as returned by `GET /api/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub job_id: String,
    pub disc_label: String,
    pub disc_type: DiscKind,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: f64,
    pub drive: String,
    #[serde(default)]
    pub step: Option<u32>,
    #[serde(default)]
    pub steps_total: Option<u32>,
    #[serde(default)]
    pub step_description: Option<String>,
}

impl JobSnapshot {
    /// Link to the job's detail page on the backend.
    pub fn detail_href(&self) -> String {
        format!("/jobs/{}", self.job_id)
    }
}

/// A sensor reading that is numeric on most hosts and textual (`"N/A"`) on others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsInfo {
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub kernel: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
}

/// Byte counts plus a usage percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageInfo {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub used: Option<u64>,
    #[serde(default)]
    pub available: Option<u64>,
    #[serde(default)]
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub cores: Option<u32>,
    #[serde(default)]
    pub threads: Option<u32>,
    /// MHz.
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub usage: Option<f64>,
    #[serde(default)]
    pub temperature: Option<Reading>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncoderVendor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub codecs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HwEncoderInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendors: std::collections::BTreeMap<String, EncoderVendor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<f64>,
    #[serde(default)]
    pub temperature: Option<Reading>,
    #[serde(default)]
    pub used_memory: Option<u64>,
    #[serde(default)]
    pub total_memory: Option<u64>,
    #[serde(default)]
    pub percent_memory: Option<f64>,
}

/// Host telemetry as returned by `GET /api/system-info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub os_info: OsInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory_info: UsageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub storage_info: UsageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpu_info: CpuInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hwenc_info: HwEncoderInfo,
    #[serde(default, deserialize_with = "gpu_list")]
    pub gpu_info: Vec<GpuInfo>,
}

/// Explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Some hosts report GPU info as a placeholder object instead of a list.
fn gpu_list<'de, D>(deserializer: D) -> Result<Vec<GpuInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}
