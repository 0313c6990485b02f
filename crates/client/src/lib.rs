pub mod backend;
pub mod http;

use thiserror::Error;

pub use backend::Backend;
pub use http::{BackendConfig, HttpBackend};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ClientError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }
}
