//! Copying libraries into a bundle's `Frameworks` folder.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bundle::FRAMEWORKS_DIR;
use crate::error::{Error, Result};

/// Copy `source` to `<contents>/Frameworks/<target_name>`, overwriting.
///
/// The `Frameworks` folder is created if missing (one level only; `contents`
/// must already exist). Permissions and access/modification times are carried
/// over from the source. Copying a file onto itself, e.g. when `source` is
/// already the bundled copy, is refused rather than truncating it.
///
/// Returns the destination path.
pub fn copy_to_frameworks(contents: &Path, source: &Path, target_name: &str) -> Result<PathBuf> {
    let frameworks = contents.join(FRAMEWORKS_DIR);
    ensure_dir(&frameworks)?;

    let dest = frameworks.join(target_name);
    if is_same_file(source, &dest) {
        return Err(Error::io(
            "Failed to copy to",
            &dest,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is the same file", source.display()),
            ),
        ));
    }
    debug!("copying {} to {}", source.display(), dest.display());
    fs::copy(source, &dest).map_err(|e| Error::io("Failed to copy to", &dest, e))?;
    copy_times(source, &dest)?;

    Ok(dest)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    match fs::create_dir(dir) {
        Ok(()) => {
            debug!("created {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(Error::io("Failed to create", dir, e)),
    }
}

/// Both paths resolve to one file. A destination that does not exist yet is
/// never the same file.
fn is_same_file(source: &Path, dest: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(dest)) {
        (Ok(source), Ok(dest)) => source == dest,
        _ => false,
    }
}

fn copy_times(source: &Path, dest: &Path) -> Result<()> {
    let meta = fs::metadata(source).map_err(|e| Error::io("Failed to read metadata:", source, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    File::open(dest)
        .and_then(|file| file.set_times(times))
        .map_err(|e| Error::io("Failed to set times on", dest, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_mock_library(path: &Path, contents: &[u8]) {
        fs::write(path, contents).unwrap();
        let mut perms = fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn test_copy_creates_frameworks() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("App.app/Contents");
        fs::create_dir_all(&contents).unwrap();
        let lib = temp.path().join("libfoo.dylib");
        create_mock_library(&lib, b"foo");

        let dest = copy_to_frameworks(&contents, &lib, "libfoo.dylib").unwrap();

        assert_eq!(dest, contents.join("Frameworks/libfoo.dylib"));
        assert_eq!(fs::read(&dest).unwrap(), b"foo");
        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_copy_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("Contents");
        fs::create_dir_all(contents.join("Frameworks")).unwrap();
        fs::write(contents.join("Frameworks/libfoo.dylib"), b"old").unwrap();
        let lib = temp.path().join("libfoo.dylib");
        create_mock_library(&lib, b"new");

        copy_to_frameworks(&contents, &lib, "libfoo.dylib").unwrap();

        assert_eq!(fs::read(contents.join("Frameworks/libfoo.dylib")).unwrap(), b"new");
    }

    #[test]
    fn test_copy_under_target_name() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("Contents");
        fs::create_dir_all(&contents).unwrap();
        let lib = temp.path().join("libfoo.1.dylib");
        create_mock_library(&lib, b"foo");

        let dest = copy_to_frameworks(&contents, &lib, "libfoo.dylib").unwrap();
        assert_eq!(dest.file_name().unwrap(), "libfoo.dylib");
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("Contents");
        fs::create_dir_all(&contents).unwrap();
        let lib = temp.path().join("libfoo.dylib");
        create_mock_library(&lib, b"foo");
        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&lib)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let dest = copy_to_frameworks(&contents, &lib, "libfoo.dylib").unwrap();
        assert_eq!(fs::metadata(dest).unwrap().modified().unwrap(), past);
    }

    #[test]
    fn test_copy_missing_contents_fails() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("libfoo.dylib");
        create_mock_library(&lib, b"foo");

        let err = copy_to_frameworks(&temp.path().join("nope/Contents"), &lib, "libfoo.dylib")
            .unwrap_err();
        assert!(matches!(err, Error::IoFailure { .. }));
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let err = copy_to_frameworks(temp.path(), &temp.path().join("libnone.dylib"), "libnone.dylib")
            .unwrap_err();
        assert!(matches!(err, Error::IoFailure { .. }));
    }

    #[test]
    fn test_copy_onto_itself_keeps_library() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("Contents");
        fs::create_dir_all(contents.join("Frameworks")).unwrap();
        let lib = contents.join("Frameworks/libfoo.dylib");
        create_mock_library(&lib, b"real library bytes");

        let err = copy_to_frameworks(&contents, &lib, "libfoo.dylib").unwrap_err();

        assert!(matches!(err, Error::IoFailure { .. }));
        assert!(err.to_string().contains("is the same file"), "got: {err}");
        assert_eq!(fs::read(&lib).unwrap(), b"real library bytes");
    }

    #[test]
    fn test_copy_onto_itself_through_symlink() {
        let temp = TempDir::new().unwrap();
        let contents = temp.path().join("Contents");
        fs::create_dir_all(contents.join("Frameworks")).unwrap();
        let lib = contents.join("Frameworks/libfoo.dylib");
        create_mock_library(&lib, b"real library bytes");
        let link = temp.path().join("libfoo.dylib");
        std::os::unix::fs::symlink(&lib, &link).unwrap();

        let err = copy_to_frameworks(&contents, &link, "libfoo.dylib").unwrap_err();

        assert!(matches!(err, Error::IoFailure { .. }));
        assert_eq!(fs::read(&lib).unwrap(), b"real library bytes");
    }

    #[test]
    fn test_copy_frameworks_is_a_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Frameworks"), b"").unwrap();
        let lib = temp.path().join("libfoo.dylib");
        create_mock_library(&lib, b"foo");

        let err = copy_to_frameworks(temp.path(), &lib, "libfoo.dylib").unwrap_err();
        assert!(matches!(err, Error::IoFailure { .. }));
    }
}
