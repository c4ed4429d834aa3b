use crate::error::{ExtractionError, Result};
use crate::types::ArchiveFormat;
use flate2::GzHeader;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extractor for single-member gzip content (one compressed file, no container)
pub struct GzipExtractor;

impl GzipExtractor {
    /// Decompress a gzip member into a single file under `dest_path`
    ///
    /// The output name comes from the FNAME header field when present (final
    /// path component only, since the field may carry directory separators),
    /// then from `source_name` with its `.gz` suffix removed, then the
    /// literal name `file`.
    ///
    /// # Arguments
    /// * `reader` - Reader positioned at the start of the gzip member
    /// * `dest_path` - Destination directory, created if missing
    /// * `source_name` - Name of the compressed source, when one exists
    ///
    /// # Returns
    /// * `Ok(Vec<PathBuf>)` - The single extracted file on success
    /// * `Err(Error)` - Malformed member or write failure
    pub fn extract_reader<R: Read>(
        reader: R,
        dest_path: &Path,
        source_name: Option<&Path>,
    ) -> Result<Vec<PathBuf>> {
        debug!(?dest_path, "extracting GZIP member");

        std::fs::create_dir_all(dest_path)?;

        let mut decoder = GzDecoder::new(reader);

        // The header only becomes available once decompression begins, so
        // the output is staged to a temporary file before its name is known.
        let mut staged = tempfile::NamedTempFile::new_in(dest_path)?;

        std::io::copy(&mut decoder, staged.as_file_mut()).map_err(|e| {
            ExtractionError::Malformed {
                format: ArchiveFormat::Gzip,
                reason: format!("failed to decompress: {}", e),
            }
        })?;

        let out_path = dest_path.join(Self::output_name(decoder.header(), source_name));

        staged
            .persist(&out_path)
            .map_err(|e| ExtractionError::WriteFailed {
                path: out_path.clone(),
                reason: e.to_string(),
            })?;

        info!(?out_path, "GZIP extraction successful");

        Ok(vec![out_path])
    }

    /// Pick the output file name for a decompressed gzip member
    fn output_name(header: Option<&GzHeader>, source_name: Option<&Path>) -> PathBuf {
        if let Some(name) = header.and_then(GzHeader::filename) {
            let name = String::from_utf8_lossy(name);
            if let Some(base) = Path::new(name.as_ref()).file_name() {
                return PathBuf::from(base);
            }
        }

        if let Some(name) = source_name.and_then(Path::file_name) {
            let name = Path::new(name);
            if name.extension().is_some_and(|ext| ext == "gz") {
                return name.with_extension("");
            }
            return name.to_path_buf();
        }

        PathBuf::from("file")
    }
}
