//! Rewriting an executable's library references to point into its bundle.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::bundle::find_bundle;
use crate::copy::copy_to_frameworks;
use crate::error::{Error, Result};
use crate::paths::{find_matching_library, new_reference};
use crate::tools::LinkEditor;

/// How references are rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Copy each library into `Contents/Frameworks` after rewriting it.
    pub copy: bool,
    /// Rewrite to `<dir>/<name>` instead of the bundle's Frameworks folder.
    pub path: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            copy: true,
            path: None,
        }
    }
}

/// One reference change, and the file to copy into the bundle for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub old_path: String,
    pub new_path: String,
    pub library: PathBuf,
}

impl Rewrite {
    /// File name the library gets inside `Frameworks`.
    pub fn target_name(&self) -> &str {
        self.new_path.rsplit('/').next().unwrap_or(&self.new_path)
    }
}

/// Match every requested library against `references`.
///
/// Fails on the first library that `executable` does not reference, before
/// anything has been rewritten.
pub fn plan_rewrites(
    executable: &Path,
    references: &[String],
    libraries: &[PathBuf],
    override_dir: Option<&Path>,
) -> Result<Vec<Rewrite>> {
    libraries
        .iter()
        .map(|library| {
            let name = library
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let old_path = find_matching_library(references, &name).ok_or_else(|| {
                Error::UnreferencedLibrary {
                    library: name.clone(),
                    executable: executable.to_path_buf(),
                }
            })?;
            Ok(Rewrite {
                old_path: old_path.to_string(),
                new_path: new_reference(&name, override_dir),
                library: library.clone(),
            })
        })
        .collect()
}

/// Rewrite `executable`'s references to `libraries` and, unless disabled,
/// copy the libraries into the bundle.
///
/// Rewrites happen in request order. A failure part way through leaves the
/// earlier rewrites and copies in place.
///
/// Returns the rewrites that were applied.
pub fn frameworkify(
    editor: &impl LinkEditor,
    executable: &Path,
    libraries: &[PathBuf],
    options: &Options,
) -> Result<Vec<Rewrite>> {
    let bundle = find_bundle(executable)?;
    let references = editor.list_linked_libraries(&bundle.executable)?;
    let rewrites = plan_rewrites(
        executable,
        &references,
        libraries,
        options.path.as_deref(),
    )?;

    for rewrite in &rewrites {
        info!("{} -> {}", rewrite.old_path, rewrite.new_path);
        editor.rewrite_linked_library(&bundle.executable, &rewrite.old_path, &rewrite.new_path)?;
        if options.copy {
            let dest = copy_to_frameworks(&bundle.contents, &rewrite.library, rewrite.target_name())?;
            info!("copied {} to {}", rewrite.library.display(), dest.display());
        }
    }

    Ok(rewrites)
}
