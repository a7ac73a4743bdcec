//! Scoped acquisition of engine handles.
//!
//! Every operation opens its own file handle, uses it, and lets ownership
//! release it on scope exit — on error paths included. Nothing here caches
//! or shares handles between operations.

use std::path::Path;

use hdf5::{Dataset, File, Group};

use crate::error::{Error, Result};

/// Open an existing file read-only.
pub(crate) fn open_read(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(Error::NotFound(format!("file '{}'", path.display())));
    }
    Ok(File::open(path)?)
}

/// Open an existing file for reading and writing.
pub(crate) fn open_rw(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(Error::NotFound(format!("file '{}'", path.display())));
    }
    Ok(File::open_rw(path)?)
}

/// Open a group by name, distinguishing absence from engine failure.
pub(crate) fn open_group(file: &File, name: &str) -> Result<Group> {
    if name != "/" && !file.link_exists(name) {
        return Err(Error::NotFound(format!("group '{}'", name)));
    }
    Ok(file.group(name)?)
}

/// Open a dataset by name, distinguishing absence from engine failure.
pub(crate) fn open_dataset(file: &File, name: &str) -> Result<Dataset> {
    if !file.link_exists(name) {
        return Err(Error::NotFound(format!("dataset '{}'", name)));
    }
    Ok(file.dataset(name)?)
}
