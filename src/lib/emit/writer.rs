// SPDX-License-Identifier: Apache-2.0

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{ErrorKind, NetplanError};

#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o600;

fn temp_path(path: &Path) -> Result<PathBuf, NetplanError> {
    let name = path.file_name().ok_or_else(|| {
        NetplanError::new(
            ErrorKind::InvalidFormat,
            format!("Invalid output file path {}", path.display()),
        )
    })?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}

/// Replace `path` with `content`: written to a hidden sibling first, then
/// renamed over the target. Parent directories are created on demand.
pub(crate) fn write_atomic(
    path: &Path,
    content: &str,
) -> Result<(), NetplanError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| NetplanError::file_error(dir, e))?;
    }
    let tmp = temp_path(path)?;
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }
    let result = options
        .open(&tmp)
        .and_then(|mut fd| {
            fd.write_all(content.as_bytes())?;
            fd.sync_all()
        })
        .and_then(|_| std::fs::rename(&tmp, path));
    if let Err(e) = result {
        std::fs::remove_file(&tmp).ok();
        return Err(NetplanError::file_error(path, e));
    }
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Remove `path`, a file whose settings all moved elsewhere.
pub(crate) fn remove_stale(path: &Path) -> Result<(), NetplanError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            log::info!("Removed {}, no settings left", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(NetplanError::file_error(path, e)),
    }
}
