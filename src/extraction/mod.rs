//! Archive extraction for ZIP, TAR, and GZIP content
//!
//! This module hosts one extractor per container family plus the async
//! dispatchers that route an already-classified input to the right one.
//! Decompression is CPU-bound and always runs on the blocking thread pool.

mod gzip;
mod tar;
mod zip;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

// Re-exports
pub use gzip::GzipExtractor;
pub use tar::TarExtractor;
pub use zip::ZipExtractor;

use crate::error::{ExtractionError, Result};
use crate::types::{ArchiveFormat, ByteStream};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;
use tokio_util::io::SyncIoBridge;
use tracing::info;

/// Run a blocking extraction closure on the blocking thread pool
pub(crate) async fn run_blocking<T>(task: impl FnOnce() -> Result<T> + Send + 'static) -> Result<T>
where
    T: Send + 'static,
{
    match spawn_blocking(task).await {
        Ok(result) => result,
        Err(e) => Err(ExtractionError::TaskFailed {
            reason: format!("extraction task panicked: {}", e),
        }
        .into()),
    }
}

/// Extract an archive file on disk into `dest_path`
///
/// # Arguments
/// * `format` - Container format to extract as
/// * `archive_path` - Path to the archive file
/// * `dest_path` - Destination directory for extraction
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - List of extracted files on success
/// * `Err(Error)` - Extraction error (malformed archive, write failure, etc.)
pub async fn extract_path(
    format: ArchiveFormat,
    archive_path: &Path,
    dest_path: &Path,
) -> Result<Vec<PathBuf>> {
    info!(
        ?archive_path,
        %format,
        ?dest_path,
        "dispatching extraction to appropriate extractor"
    );

    let archive = archive_path.to_path_buf();
    let dest = dest_path.to_path_buf();

    match format {
        ArchiveFormat::Zip => {
            run_blocking(move || ZipExtractor::extract_reader(std::fs::File::open(&archive)?, &dest))
                .await
        }
        ArchiveFormat::Tar => {
            run_blocking(move || TarExtractor::extract_reader(std::fs::File::open(&archive)?, &dest))
                .await
        }
        ArchiveFormat::TarGzip => {
            run_blocking(move || {
                TarExtractor::extract_compressed_reader(std::fs::File::open(&archive)?, &dest)
            })
            .await
        }
        ArchiveFormat::Gzip => {
            run_blocking(move || {
                let file = std::fs::File::open(&archive)?;
                GzipExtractor::extract_reader(file, &dest, Some(&archive))
            })
            .await
        }
    }
}

/// Extract an in-memory archive buffer into `dest_path`
pub async fn extract_buffer(
    format: ArchiveFormat,
    buf: Vec<u8>,
    dest_path: &Path,
) -> Result<Vec<PathBuf>> {
    info!(
        %format,
        len = buf.len(),
        ?dest_path,
        "dispatching extraction to appropriate extractor"
    );

    let dest = dest_path.to_path_buf();

    match format {
        ArchiveFormat::Zip => {
            run_blocking(move || ZipExtractor::extract_reader(Cursor::new(buf), &dest)).await
        }
        ArchiveFormat::Tar => {
            run_blocking(move || TarExtractor::extract_reader(Cursor::new(buf), &dest)).await
        }
        ArchiveFormat::TarGzip => {
            run_blocking(move || TarExtractor::extract_compressed_reader(Cursor::new(buf), &dest))
                .await
        }
        ArchiveFormat::Gzip => {
            run_blocking(move || GzipExtractor::extract_reader(Cursor::new(buf), &dest, None)).await
        }
    }
}

/// Extract an archive from an async byte stream into `dest_path`
///
/// `prefix` holds bytes already consumed from the stream for classification;
/// they are replayed ahead of the remaining data. TAR and GZIP content is
/// decompressed as the stream arrives. ZIP needs random access, so its
/// remainder is buffered in memory first.
pub async fn extract_stream(
    format: ArchiveFormat,
    prefix: Vec<u8>,
    rest: ByteStream,
    dest_path: &Path,
) -> Result<Vec<PathBuf>> {
    info!(
        %format,
        ?dest_path,
        "dispatching stream extraction to appropriate extractor"
    );

    let dest = dest_path.to_path_buf();

    // SyncIoBridge::new captures the runtime handle, so the bridge is built
    // here and moved into the blocking task where its reads are allowed
    let bridge = SyncIoBridge::new(rest);

    match format {
        ArchiveFormat::Zip => {
            run_blocking(move || {
                let mut buf = prefix;
                let mut reader = bridge;
                reader.read_to_end(&mut buf)?;
                ZipExtractor::extract_reader(Cursor::new(buf), &dest)
            })
            .await
        }
        ArchiveFormat::Tar => {
            run_blocking(move || {
                TarExtractor::extract_reader(Cursor::new(prefix).chain(bridge), &dest)
            })
            .await
        }
        ArchiveFormat::TarGzip => {
            run_blocking(move || {
                TarExtractor::extract_compressed_reader(Cursor::new(prefix).chain(bridge), &dest)
            })
            .await
        }
        ArchiveFormat::Gzip => {
            run_blocking(move || {
                GzipExtractor::extract_reader(Cursor::new(prefix).chain(bridge), &dest, None)
            })
            .await
        }
    }
}
