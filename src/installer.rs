//! Writing the extracted executable into place
//!
//! Mirrors the staging step of a system install but without privilege
//! separation: the destination is always under a user-writable root.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::InstallError;

/// Write `content` to `path`, creating missing parent directories and
/// retrying once if the first write fails.
pub fn write_with_retry(path: &Path, content: &[u8]) -> Result<(), InstallError> {
    let first = match fs::write(path, content) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    debug!("Write to {} failed ({}), creating parent directories", path.display(), first);

    if let Some(parent) = path.parent() {
        // Might already exist; the retry decides
        let _ = fs::create_dir_all(parent);
    }

    fs::write(path, content).map_err(|source| InstallError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Set mode 0755. Filesystems without Unix permissions are tolerated.
pub fn make_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o755)) {
            log::warn!("Failed to set permissions on {}: {}", path.display(), e);
        }
    }

    #[cfg(not(unix))]
    {
        debug!("No executable bit to set for {}", path.display());
    }
}

/// Write an executable and mark it runnable.
pub fn install_executable(path: &Path, content: &[u8]) -> Result<(), InstallError> {
    write_with_retry(path, content)?;
    make_executable(path);
    Ok(())
}
