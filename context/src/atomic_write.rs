//! Crash-safe file replacement for the settings store.
//!
//! Writes land in a temp file beside the target and are renamed over it, so a
//! reader never observes a half-written store. On Windows, rename-over-existing
//! fails, so the old file is moved aside to `.bak` first and restored if the
//! second rename fails too.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy)]
pub struct AtomicWriteOptions {
    /// Call `sync_all()` on the temp file before the rename.
    pub sync_all: bool,
    /// Unix permission bits for the final file, e.g. `0o600`.
    pub unix_mode: Option<u32>,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self {
            sync_all: true,
            unix_mode: Some(0o600),
        }
    }
}

/// Replace `path` with `bytes`, creating missing parent directories.
pub fn atomic_write(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: AtomicWriteOptions,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    #[cfg(unix)]
    if let Some(mode) = options.unix_mode {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(mode))?;
    }

    tmp.write_all(bytes)?;
    if options.sync_all {
        tmp.as_file().sync_all()?;
    }

    let Err(err) = tmp.persist(path) else {
        return Ok(());
    };
    if !path.exists() {
        return Err(err.error);
    }

    let backup_path = path.with_extension("bak");
    let _ = std::fs::remove_file(&backup_path);
    std::fs::rename(path, &backup_path)?;
    if let Err(rename_err) = err.file.persist(path) {
        let _ = std::fs::rename(&backup_path, path);
        return Err(rename_err.error);
    }
    if let Err(e) = std::fs::remove_file(&backup_path) {
        tracing::warn!(
            path = %backup_path.display(),
            "Failed to remove .bak after store write: {e}"
        );
    }
    Ok(())
}
