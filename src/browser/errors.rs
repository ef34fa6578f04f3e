//! Error types for browser automation.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("no element matches {0}")]
    NotFound(String),
    #[error("timed out after {waited:?} waiting for {locator} to be {condition}")]
    Timeout {
        locator: String,
        condition: &'static str,
        waited: Duration,
    },
    #[error("{0} is not supported by this driver")]
    Unsupported(String),
    #[error("script failed: {0}")]
    Script(String),
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("devtools protocol error: {0}")]
    Protocol(String),
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        Self::Protocol(e.to_string())
    }
}

/// Problems with the local environment, detected before any navigation.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("unsupported operating system: {0}")]
    UnsupportedOs(String),
    #[error("browser executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),
    #[error("failed to prepare browser executable {}", .path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
