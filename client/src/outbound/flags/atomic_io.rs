//! Atomic file replacement inside a capability directory.
//!
//! Contents go to a hidden temporary file beside the target, which is then
//! renamed over it, so readers never observe a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::FlagStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `path` (a bare file name within `dir`) with `contents`.
pub(super) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &str,
) -> Result<(), FlagStoreError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(FlagStoreError::io(format!(
            "flag file `{path}` must be a bare file name"
        )));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    write_to_temp_file(dir, &tmp_name, contents).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        FlagStoreError::io(format!("writing `{tmp_name}`: {err}"))
    })?;
    rename_temp_to_target(dir, &tmp_name, file_name).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        FlagStoreError::io(format!("replacing `{file_name}`: {err}"))
    })?;
    sync_directory(dir);
    Ok(())
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Best effort; the rename already landed.
    }
}
