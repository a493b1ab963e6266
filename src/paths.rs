//! Matching requested libraries against linked references, and computing the
//! references they are rewritten to.

use std::path::Path;

/// Reference prefix used when no override directory is given.
pub const DEFAULT_PREFIX: &str = "@executable_path/../Frameworks/";

/// Final path component of a reference, as written by the linker.
fn reference_basename(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Find the first reference whose basename matches `basename`, ignoring case.
///
/// Returns `None` if the library is not referenced.
#[must_use = "matched reference should be rewritten"]
pub fn find_matching_library<'a>(references: &'a [String], basename: &str) -> Option<&'a str> {
    let wanted = basename.to_lowercase();
    references
        .iter()
        .map(String::as_str)
        .find(|reference| reference_basename(reference).to_lowercase() == wanted)
}

/// The reference `basename` is rewritten to.
///
/// `<dir>/<basename>` when an override directory is given, otherwise
/// `@executable_path/../Frameworks/<basename>`.
pub fn new_reference(basename: &str, override_dir: Option<&Path>) -> String {
    match override_dir {
        Some(dir) => dir.join(basename).to_string_lossy().into_owned(),
        None => format!("{DEFAULT_PREFIX}{basename}"),
    }
}
