use crate::error::{ExtractionError, Result};
use crate::types::ArchiveFormat;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive extractor for ZIP content
pub struct ZipExtractor;

impl ZipExtractor {
    /// Extract all entries of a ZIP archive into `dest_path`
    ///
    /// The reader must support seeking because the ZIP central directory
    /// lives at the end of the archive. Entries whose names would escape
    /// `dest_path` are skipped with a warning.
    ///
    /// # Arguments
    /// * `reader` - Seekable reader positioned at the start of the archive
    /// * `dest_path` - Destination directory, created if missing
    ///
    /// # Returns
    /// * `Ok(Vec<PathBuf>)` - List of extracted files on success
    /// * `Err(Error)` - Malformed archive or write failure
    pub fn extract_reader<R: Read + Seek>(reader: R, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?dest_path, "extracting ZIP archive");

        std::fs::create_dir_all(dest_path)?;

        let mut archive = zip::ZipArchive::new(reader).map_err(|e| ExtractionError::Malformed {
            format: ArchiveFormat::Zip,
            reason: format!("failed to read ZIP archive: {}", e),
        })?;

        let mut extracted_files = Vec::new();

        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| ExtractionError::Malformed {
                format: ArchiveFormat::Zip,
                reason: format!("failed to read ZIP entry: {}", e),
            })?;

            if let Some(path) = Self::extract_entry(entry, dest_path)? {
                extracted_files.push(path);
            }
        }

        info!(
            ?dest_path,
            extracted_count = extracted_files.len(),
            "ZIP extraction successful"
        );

        Ok(extracted_files)
    }

    /// Extract a single ZIP entry to disk, creating directories as needed
    fn extract_entry(mut entry: zip::read::ZipFile, dest_path: &Path) -> Result<Option<PathBuf>> {
        // enclosed_name rejects absolute paths and parent-directory components
        let entry_path = match entry.enclosed_name() {
            Some(path) => dest_path.join(path),
            None => {
                warn!(entry = entry.name(), "skipping entry with unsafe path");
                return Ok(None);
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&entry_path)?;
            return Ok(None);
        }

        if let Some(parent) = entry_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut outfile =
            std::fs::File::create(&entry_path).map_err(|e| ExtractionError::WriteFailed {
                path: entry_path.clone(),
                reason: e.to_string(),
            })?;

        std::io::copy(&mut entry, &mut outfile).map_err(|e| ExtractionError::WriteFailed {
            path: entry_path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(entry_path))
    }
}
