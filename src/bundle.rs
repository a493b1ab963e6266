//! Locating the application bundle around an executable.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the bundle folder that holds copied libraries.
pub const FRAMEWORKS_DIR: &str = "Frameworks";

/// An executable inside `<Name>.app/Contents/MacOS/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Absolute path of the executable.
    pub executable: PathBuf,
    /// The bundle's `Contents` directory.
    pub contents: PathBuf,
}

impl Bundle {
    /// `<contents>/Frameworks`, whether or not it exists yet.
    pub fn frameworks_dir(&self) -> PathBuf {
        self.contents.join(FRAMEWORKS_DIR)
    }
}

/// Resolve the bundle that contains `executable`.
///
/// # Errors
///
/// - [`Error::NotFound`] if the path is not a regular file
/// - [`Error::InvalidBundleLayout`] if its parent directory is not `MacOS`
pub fn find_bundle(executable: &Path) -> Result<Bundle> {
    let executable = std::path::absolute(executable)
        .map(|path| normalize(&path))
        .map_err(|_| Error::NotFound(executable.to_path_buf()))?;
    if !executable.is_file() {
        return Err(Error::NotFound(executable));
    }

    let Some(folder) = executable.parent() else {
        return Err(Error::InvalidBundleLayout(executable));
    };
    if folder.file_name().is_none_or(|name| name != "MacOS") {
        return Err(Error::InvalidBundleLayout(executable));
    }
    let Some(contents) = folder.parent() else {
        return Err(Error::InvalidBundleLayout(executable));
    };

    Ok(Bundle {
        contents: contents.to_path_buf(),
        executable,
    })
}

/// Fold `..` components lexically, without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
