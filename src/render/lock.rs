//! Probe whether an output file is held open by another program.
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use crate::common::{Error, Result};

/// Windows sharing and lock violations.
#[cfg(windows)]
const SHARING_VIOLATION: i32 = 32;
#[cfg(windows)]
const LOCK_VIOLATION: i32 = 33;

/// Whether `path` exists and cannot be opened for writing.
///
/// A missing file is free. Busy and permission errors mean locked; any other
/// failure is returned as is.
pub fn is_locked(path: &Path) -> Result<bool> {
    match OpenOptions::new().read(true).write(true).open(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) if is_lock_error(&e) => {
            debug!("{} is locked: {e}", path.display());
            Ok(true)
        },
        Err(e) => Err(e.into()),
    }
}

fn is_lock_error(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::ResourceBusy)
        || is_sharing_violation(e)
}

#[cfg(windows)]
fn is_sharing_violation(e: &std::io::Error) -> bool {
    matches!(e.raw_os_error(), Some(SHARING_VIOLATION | LOCK_VIOLATION))
}

#[cfg(not(windows))]
fn is_sharing_violation(_e: &std::io::Error) -> bool {
    false
}

/// Fail with [`Error::Locked`] when `path` is locked.
pub fn ensure_unlocked(path: &Path) -> Result<()> {
    if is_locked(path)? {
        return Err(Error::Locked(path.to_path_buf()));
    }
    Ok(())
}
