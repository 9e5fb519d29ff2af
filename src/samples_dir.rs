//! Samples directory bootstrap and write-permission check

use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, error};

/// Make sure the samples directory exists and is writable
///
/// Creates the directory (and missing parents) if needed; calling this on an
/// existing directory is not an error. Problems are logged and reported as
/// `false`; the caller decides whether to abort.
pub async fn is_samples_dir_ok(path: &Path) -> bool {
    match ensure_samples_dir(path).await {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Samples directory is not usable");
            false
        }
    }
}

/// Like [`is_samples_dir_ok`], but returns the reason on failure
pub async fn ensure_samples_dir(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "Checking if samples directory exists and is writable");

    tokio::fs::create_dir_all(path).await.map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::PermissionDenied {
            "permission denied to create directory".to_string()
        } else {
            format!("failed to create directory: {}", e)
        };
        Error::SamplesDir {
            path: path.to_path_buf(),
            reason,
        }
    })?;

    if !is_writable(path).await? {
        return Err(Error::SamplesDir {
            path: path.to_path_buf(),
            reason: "directory needs to be writable".to_string(),
        });
    }

    Ok(())
}

#[cfg(unix)]
async fn is_writable(path: &Path) -> Result<bool> {
    use std::os::unix::ffi::OsStrExt;

    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).map_err(|_| {
        Error::SamplesDir {
            path: path.to_path_buf(),
            reason: "path contains an interior NUL byte".to_string(),
        }
    })?;

    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    let rc = unsafe { libc::access(c_path.as_ptr(), libc::W_OK) };
    Ok(rc == 0)
}

#[cfg(not(unix))]
async fn is_writable(path: &Path) -> Result<bool> {
    let metadata = tokio::fs::metadata(path).await?;
    Ok(!metadata.permissions().readonly())
}
