//! Error types for unarchive
//!
//! This module provides the error taxonomy for the library:
//! - CRX container translation failures ([`CrxError`]) with structured diagnostics
//! - Archive extraction failures ([`ExtractionError`])
//! - Orchestration failures (missing destination, unsupported file type, stream caps)
//!
//! Every failure is a typed value surfaced to the caller; nothing is
//! logged-and-swallowed.

use crate::types::ArchiveFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unarchive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for unarchive
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// CRX container translation failed
    #[error(transparent)]
    Crx(#[from] CrxError),

    /// Archive extraction failed
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// A buffer or stream input was given without an explicit destination
    ///
    /// Only file-path inputs can derive a destination from their own name.
    #[error("destination path is required for buffer and stream inputs")]
    DestinationRequired,

    /// The input did not classify as a known archive kind and the fallback
    /// ZIP extraction also failed
    #[error(
        "unsupported file type (extension: {}, mime: {})",
        extension.as_deref().unwrap_or("unknown"),
        mime.as_deref().unwrap_or("unknown")
    )]
    UnsupportedFileType {
        /// Extension label produced by the type resolver, when any
        extension: Option<String>,
        /// MIME label produced by the type resolver, when any
        mime: Option<String>,
        /// Source path, when the input was a file on disk
        path: Option<PathBuf>,
    },

    /// Draining a stream input would exceed the configured in-memory cap
    #[error("stream exceeded the in-memory buffering limit of {limit} bytes")]
    StreamTooLarge {
        /// The configured cap that was exceeded, in bytes
        limit: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// CRX container translation errors
///
/// Produced by [`crx_to_zip`](crate::crx::crx_to_zip) when a buffer cannot be
/// validated as a CRX container wrapping a ZIP payload. The translator never
/// partially succeeds: it either returns a fully valid ZIP view or fails with
/// one of these kinds before producing any output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrxError {
    /// Buffer shorter than the minimum CRX header (12 bytes)
    #[error("invalid CRX: file too small")]
    FileTooSmall,

    /// First 4 bytes match neither the CRX nor the ZIP magic
    #[error(
        "invalid CRX header: expected Cr24 but found {:08x}",
        u32::from_be_bytes(*found)
    )]
    InvalidMagic {
        /// The 4 bytes actually observed at the start of the buffer
        found: [u8; 4],
    },

    /// Format version field is neither 2 nor 3
    ///
    /// The carried value is the raw u32 read from the buffer; it may be a
    /// large garbage number when non-header bytes are misread as a version.
    #[error("unexpected CRX format version: {version}, only versions 2 and 3 are supported")]
    UnsupportedVersion {
        /// The raw version value observed at byte offset 4
        version: u32,
    },

    /// Version 2 header, but the buffer is too short to contain the
    /// public-key and signature length fields
    #[error("invalid CRX v2: file too small to contain header lengths")]
    V2HeaderTooSmall,

    /// Computed ZIP payload offset is at or beyond the end of the buffer
    #[error("invalid CRX: ZIP data offset exceeds file size")]
    OffsetExceedsFileSize,
}

/// Archive extraction errors
///
/// Failures raised by the zip/tar/flate2 extraction layer. These pass through
/// [`Error::Extraction`] unmodified, except in the orchestrator's ZIP-fallback
/// branch where they are reclassified as [`Error::UnsupportedFileType`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Archive content could not be parsed as the expected format
    #[error("malformed {format} archive: {reason}")]
    Malformed {
        /// The format the extractor was asked to decode
        format: ArchiveFormat,
        /// The reason decoding failed
        reason: String,
    },

    /// An extracted entry could not be written to disk
    #[error("failed to write {path}: {reason}")]
    WriteFailed {
        /// The destination path that could not be written
        path: PathBuf,
        /// The reason the write failed
        reason: String,
    },

    /// The blocking extraction task panicked or was cancelled
    #[error("extraction task failed: {reason}")]
    TaskFailed {
        /// The reason the task did not run to completion
        reason: String,
    },
}
