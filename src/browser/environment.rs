//! Host checks performed before a browser is launched.

use super::errors::EnvironmentError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Result<Self, EnvironmentError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name (as in [`std::env::consts::OS`]) to a supported platform.
    pub fn from_os(os: &str) -> Result<Self, EnvironmentError> {
        let os = os.to_lowercase();
        if os.contains("mac") || os == "darwin" {
            Ok(Self::MacOs)
        } else if os.contains("win") {
            Ok(Self::Windows)
        } else if os.contains("linux") || os.contains("nix") || os.contains("nux") {
            Ok(Self::Linux)
        } else {
            Err(EnvironmentError::UnsupportedOs(os))
        }
    }

    fn is_unix(self) -> bool {
        !matches!(self, Self::Windows)
    }
}

/// Validate the configured browser executable.
///
/// Returns `None` when nothing is configured, leaving discovery to the driver.
/// A configured path is made absolute, must exist, and on Unix gets its
/// executable bit set if it is missing.
pub fn resolve_browser(
    platform: Platform,
    configured: Option<&Path>,
) -> Result<Option<PathBuf>, EnvironmentError> {
    let Some(configured) = configured else {
        debug!(?platform, "no browser path configured, using auto-detection");
        return Ok(None);
    };

    let path = if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(configured))
            .unwrap_or_else(|_| configured.to_path_buf())
    };

    if !path.is_file() {
        return Err(EnvironmentError::MissingExecutable(path));
    }

    if platform.is_unix() {
        ensure_executable(&path)?;
    }

    info!(path = %path.display(), ?platform, "using configured browser executable");
    Ok(Some(path))
}

#[cfg(unix)]
fn ensure_executable(path: &Path) -> Result<(), EnvironmentError> {
    use std::os::unix::fs::PermissionsExt;

    let to_err = |source| EnvironmentError::Permissions {
        path: path.to_path_buf(),
        source,
    };
    let mut permissions = std::fs::metadata(path).map_err(to_err)?.permissions();
    let mode = permissions.mode();
    if mode & 0o111 == 0 {
        permissions.set_mode(mode | 0o755);
        std::fs::set_permissions(path, permissions).map_err(to_err)?;
        debug!(path = %path.display(), "marked browser executable");
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_executable(_path: &Path) -> Result<(), EnvironmentError> {
    Ok(())
}
