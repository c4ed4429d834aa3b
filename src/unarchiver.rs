//! Unarchive orchestration
//!
//! This module wires the pipeline together: resolve the destination,
//! classify the input by content, then route it to the matching extractor.
//! CRX containers are translated to their embedded ZIP view before
//! extraction, and anything without a dedicated route gets one ZIP attempt
//! before being reported as unsupported.

use crate::config::Config;
use crate::crx;
use crate::error::{Error, Result};
use crate::extraction::{self, ZipExtractor};
use crate::sniff;
use crate::types::{ArchiveFormat, ByteStream, FormatClassification, InputSource};
use crate::utils::remove_archive_extension;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Archive extraction orchestrator
///
/// Holds the configuration shared by all operations. Cheap to construct
/// and clone; one instance can serve any number of calls.
#[derive(Clone, Debug, Default)]
pub struct Unarchiver {
    config: Config,
}

impl Unarchiver {
    /// Create an orchestrator with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Extract an archive into a destination directory
    ///
    /// The input is classified by content, never by name: tar, gzip, and
    /// gzip-compressed tar content extracts directly; CRX containers are
    /// translated to their embedded ZIP first; everything else is attempted
    /// as ZIP.
    ///
    /// # Arguments
    ///
    /// * `input` - Archive source: a path, an in-memory buffer, or an async
    ///   byte stream
    /// * `dest` - Destination directory; optional for path inputs, which
    ///   derive one from the archive name by dropping its extension
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` once every entry is on disk, or the first error
    /// encountered: [`Error::DestinationRequired`] for nameless inputs
    /// without a destination, [`CrxError`](crate::CrxError) values for
    /// malformed CRX containers, and [`Error::UnsupportedFileType`] when
    /// the default ZIP attempt fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use unarchive::Unarchiver;
    ///
    /// # async fn example() -> unarchive::Result<()> {
    /// let unarchiver = Unarchiver::default();
    ///
    /// // Derives the destination ./bundle from the archive name
    /// unarchiver.unarchive("bundle.zip", None).await?;
    ///
    /// // Explicit destination
    /// unarchiver.unarchive("data.tar.gz", Some(Path::new("out"))).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn unarchive(
        &self,
        input: impl Into<InputSource>,
        dest: Option<&Path>,
    ) -> Result<()> {
        let input = input.into();
        let dest = resolve_dest(&input, dest)?;

        info!(?input, ?dest, "starting unarchive");

        let extracted = match input {
            InputSource::Path(path) => self.unarchive_path(&path, &dest).await?,
            InputSource::Buffer(buf) => self.unarchive_buffer(buf, &dest).await?,
            InputSource::Stream(stream) => self.unarchive_stream(stream, &dest).await?,
        };

        info!(
            ?dest,
            extracted_count = extracted.len(),
            "unarchive complete"
        );

        Ok(())
    }

    async fn unarchive_path(&self, path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
        let classification = sniff::classify_path(path, self.config.sniff_buffer_bytes).await?;
        debug!(?path, ?classification, "classified input");

        match Route::from_classification(&classification) {
            Route::Format(format) => extraction::extract_path(format, path, dest).await,
            Route::Crx => {
                let buf = tokio::fs::read(path).await?;
                extract_crx_buffer(buf, dest).await
            }
            Route::Default => {
                match extraction::extract_path(ArchiveFormat::Zip, path, dest).await {
                    Ok(files) => Ok(files),
                    Err(e) => Err(unsupported(e, classification, Some(path.to_path_buf()))),
                }
            }
        }
    }

    async fn unarchive_buffer(&self, buf: Vec<u8>, dest: &Path) -> Result<Vec<PathBuf>> {
        let classification = sniff::classify_bytes(&buf);
        debug!(len = buf.len(), ?classification, "classified input");

        match Route::from_classification(&classification) {
            Route::Format(format) => extraction::extract_buffer(format, buf, dest).await,
            Route::Crx => extract_crx_buffer(buf, dest).await,
            Route::Default => {
                match extraction::extract_buffer(ArchiveFormat::Zip, buf, dest).await {
                    Ok(files) => Ok(files),
                    Err(e) => Err(unsupported(e, classification, None)),
                }
            }
        }
    }

    async fn unarchive_stream(&self, mut stream: ByteStream, dest: &Path) -> Result<Vec<PathBuf>> {
        let prefix = sniff::read_prefix(&mut stream, self.config.sniff_buffer_bytes).await?;
        let classification = sniff::classify_bytes(&prefix);
        debug!(prefix_len = prefix.len(), ?classification, "classified input");

        match Route::from_classification(&classification) {
            Route::Format(format) => {
                extraction::extract_stream(format, prefix, stream, dest).await
            }
            Route::Crx => {
                let buf = self.drain_stream(prefix, stream).await?;
                extract_crx_buffer(buf, dest).await
            }
            Route::Default => {
                // ZIP needs random access, so the stream is buffered up front
                let buf = self.drain_stream(prefix, stream).await?;
                match extraction::extract_buffer(ArchiveFormat::Zip, buf, dest).await {
                    Ok(files) => Ok(files),
                    Err(e) => Err(unsupported(e, classification, None)),
                }
            }
        }
    }

    /// Buffer the remainder of a stream in memory, respecting the configured cap
    async fn drain_stream(&self, prefix: Vec<u8>, rest: ByteStream) -> Result<Vec<u8>> {
        let mut buf = prefix;

        match self.config.max_stream_buffer_bytes {
            Some(limit) => {
                if buf.len() as u64 > limit {
                    warn!(limit, "stream exceeded the in-memory buffering limit");
                    return Err(Error::StreamTooLarge { limit });
                }

                // Read one byte past the cap so overshoot is detectable
                let budget = limit - buf.len() as u64 + 1;
                let read = rest.take(budget).read_to_end(&mut buf).await?;
                if read as u64 == budget {
                    warn!(limit, "stream exceeded the in-memory buffering limit");
                    return Err(Error::StreamTooLarge { limit });
                }
            }
            None => {
                let mut rest = rest;
                rest.read_to_end(&mut buf).await?;
            }
        }

        Ok(buf)
    }
}

/// Extract an archive into a destination directory using the default
/// configuration
///
/// Convenience wrapper over [`Unarchiver::unarchive`]; see there for the
/// routing and error behavior.
pub async fn unarchive(input: impl Into<InputSource>, dest: Option<&Path>) -> Result<()> {
    Unarchiver::default().unarchive(input, dest).await
}

/// Dispatch route chosen from a content classification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    /// Extract directly as the given format
    Format(ArchiveFormat),
    /// Strip the CRX container, then extract the embedded ZIP
    Crx,
    /// No dedicated route: attempt ZIP, report unsupported on failure
    Default,
}

impl Route {
    fn from_classification(classification: &FormatClassification) -> Self {
        match classification.extension.as_deref() {
            Some("tar") => Self::Format(ArchiveFormat::Tar),
            Some("tar.gz") => Self::Format(ArchiveFormat::TarGzip),
            Some("gz") => Self::Format(ArchiveFormat::Gzip),
            Some("crx") => Self::Crx,
            _ => Self::Default,
        }
    }
}

/// Resolve the destination directory for an input
///
/// Path inputs derive a default destination from their own name when none
/// is given; buffer and stream inputs have no name to derive from.
fn resolve_dest(input: &InputSource, dest: Option<&Path>) -> Result<PathBuf> {
    if let Some(dest) = dest {
        return Ok(dest.to_path_buf());
    }

    match input.path() {
        Some(path) => Ok(remove_archive_extension(path)),
        None => Err(Error::DestinationRequired),
    }
}

/// Translate a CRX container held in memory and extract its embedded ZIP
async fn extract_crx_buffer(buf: Vec<u8>, dest: &Path) -> Result<Vec<PathBuf>> {
    let dest = dest.to_path_buf();

    extraction::run_blocking(move || {
        // The ZIP view borrows from `buf`, so translation and extraction
        // share one task
        let zip = crx::crx_to_zip(&buf)?;
        ZipExtractor::extract_reader(Cursor::new(zip), &dest)
    })
    .await
}

/// Reclassify a failed default-route extraction as an unsupported file type
fn unsupported(error: Error, classification: FormatClassification, path: Option<PathBuf>) -> Error {
    warn!(
        error = %error,
        ?classification,
        "fallback ZIP extraction failed, reporting unsupported file type"
    );

    Error::UnsupportedFileType {
        extension: classification.extension,
        mime: classification.mime,
        path,
    }
}
