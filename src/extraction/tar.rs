use crate::error::{ExtractionError, Result};
use crate::types::ArchiveFormat;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive extractor for TAR content, plain or gzip-compressed
pub struct TarExtractor;

impl TarExtractor {
    /// Extract all entries of a tar stream into `dest_path`
    ///
    /// Works on any reader, so tar archives extract directly from a network
    /// stream without touching disk first. Entries whose paths would escape
    /// `dest_path` are skipped with a warning.
    ///
    /// # Arguments
    /// * `reader` - Reader positioned at the start of the tar stream
    /// * `dest_path` - Destination directory, created if missing
    ///
    /// # Returns
    /// * `Ok(Vec<PathBuf>)` - List of extracted files on success
    /// * `Err(Error)` - Malformed archive or write failure
    pub fn extract_reader<R: Read>(reader: R, dest_path: &Path) -> Result<Vec<PathBuf>> {
        Self::extract_impl(reader, dest_path, ArchiveFormat::Tar)
    }

    /// Extract a gzip-compressed tar stream into `dest_path`
    ///
    /// Decompression happens inline, so the intermediate tar stream is
    /// never materialized.
    pub fn extract_compressed_reader<R: Read>(reader: R, dest_path: &Path) -> Result<Vec<PathBuf>> {
        Self::extract_impl(GzDecoder::new(reader), dest_path, ArchiveFormat::TarGzip)
    }

    /// Shared implementation behind both entry points
    fn extract_impl<R: Read>(
        reader: R,
        dest_path: &Path,
        format: ArchiveFormat,
    ) -> Result<Vec<PathBuf>> {
        debug!(?dest_path, %format, "extracting TAR archive");

        std::fs::create_dir_all(dest_path)?;

        let mut archive = tar::Archive::new(reader);
        let entries = archive.entries().map_err(|e| ExtractionError::Malformed {
            format,
            reason: format!("failed to read TAR archive: {}", e),
        })?;

        let mut extracted_files = Vec::new();

        for entry in entries {
            let mut entry = entry.map_err(|e| ExtractionError::Malformed {
                format,
                reason: format!("failed to read TAR entry: {}", e),
            })?;

            let entry_path = entry
                .path()
                .map_err(|e| ExtractionError::Malformed {
                    format,
                    reason: format!("failed to read TAR entry path: {}", e),
                })?
                .into_owned();
            let is_dir = entry.header().entry_type().is_dir();

            // unpack_in refuses entries that would land outside dest_path
            let unpacked =
                entry
                    .unpack_in(dest_path)
                    .map_err(|e| ExtractionError::WriteFailed {
                        path: dest_path.join(&entry_path),
                        reason: e.to_string(),
                    })?;

            if !unpacked {
                warn!(entry = %entry_path.display(), "skipping entry with unsafe path");
                continue;
            }

            if !is_dir {
                extracted_files.push(dest_path.join(&entry_path));
            }
        }

        info!(
            ?dest_path,
            extracted_count = extracted_files.len(),
            "TAR extraction successful"
        );

        Ok(extracted_files)
    }
}
