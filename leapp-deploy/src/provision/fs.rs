//! Filesystem primitives with explicit permission bits.
//!
//! Modes are always set after creation so the process umask never decides
//! the final permissions.

use std::fs::{self, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use leapp_deploy_shared::errors::{DeployError, DeployResult};
use tempfile::NamedTempFile;

/// Create `path` (and missing parents) and force its mode.
pub fn ensure_dir(path: &Path, mode: u32) -> DeployResult<()> {
    fs::create_dir_all(path).map_err(|e| DeployError::from_write_io(path, e))?;
    fs::set_permissions(path, Permissions::from_mode(mode))
        .map_err(|e| DeployError::from_write_io(path, e))?;
    Ok(())
}

/// Write `content` to `dest` with `mode`, atomically.
///
/// The bytes land in a temporary sibling first, then a rename replaces the
/// destination, so readers see either the old file or the complete new one.
pub fn write_atomic(dest: &Path, content: &[u8], mode: u32) -> DeployResult<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| DeployError::Storage(format!("{} has no parent", dest.display())))?;

    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|e| DeployError::from_write_io(parent, e))?;
    tmp.write_all(content)
        .map_err(|e| DeployError::from_write_io(tmp.path(), e))?;
    tmp.as_file()
        .set_permissions(Permissions::from_mode(mode))
        .map_err(|e| DeployError::from_write_io(dest, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| DeployError::from_write_io(dest, e))?;

    tmp.persist(dest)
        .map_err(|e| DeployError::from_write_io(dest, e.error))?;
    Ok(())
}

/// Permission bits of `path` (lower 12 bits).
pub fn mode_of(path: &Path) -> DeployResult<u32> {
    let metadata = fs::metadata(path).map_err(|e| DeployError::from_io(path, e))?;
    Ok(metadata.permissions().mode() & 0o7777)
}
