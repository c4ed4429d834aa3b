//! Utility functions for path manipulation

use std::path::{Path, PathBuf};

/// Derive a destination directory from an archive file name
///
/// Strips the final extension from `path`; if the result still ends in
/// `.tar`, strips that as well, so compound names like `bundle.tar.gz`
/// collapse to `bundle` rather than `bundle.tar`. The `.tar` check is
/// case-sensitive.
///
/// # Arguments
///
/// * `path` - The archive file path
///
/// # Returns
///
/// Returns the path with its archive extension(s) removed. A path with no
/// extension is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use unarchive::utils::remove_archive_extension;
///
/// assert_eq!(remove_archive_extension(Path::new("bundle.tar.gz")), PathBuf::from("bundle"));
/// assert_eq!(remove_archive_extension(Path::new("logs.txt.gz")), PathBuf::from("logs.txt"));
/// assert_eq!(remove_archive_extension(Path::new("extension.crx")), PathBuf::from("extension"));
/// ```
#[must_use]
pub fn remove_archive_extension(path: &Path) -> PathBuf {
    let stripped = path.with_extension("");
    if stripped.extension().is_some_and(|ext| ext == "tar") {
        stripped.with_extension("")
    } else {
        stripped
    }
}
