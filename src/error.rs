//! Error type shared by every step of a run.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Executable does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Executable not located inside a bundle: {}", .0.display())]
    InvalidBundleLayout(PathBuf),

    #[error("failed to list linked libraries of {}: {reason}", executable.display())]
    InspectionFailed { executable: PathBuf, reason: String },

    #[error("dylib \"{library}\" is not referenced by \"{}\"", executable.display())]
    UnreferencedLibrary { library: String, executable: PathBuf },

    #[error("{action} {}: {source}", path.display())]
    IoFailure {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to change \"{old}\" to \"{new}\" in {}: {reason}", executable.display())]
    PatchFailed {
        executable: PathBuf,
        old: String,
        new: String,
        reason: String,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::IoFailure {
            action,
            path: path.into(),
            source,
        }
    }
}
