//! # unarchive
//!
//! Archive extraction with content-based format detection and transparent
//! CRX-to-ZIP unwrapping.
//!
//! ## Design Philosophy
//!
//! unarchive is designed to be:
//! - **Content-driven** - Inputs are classified by magic bytes, never by file name
//! - **Source-agnostic** - Paths, in-memory buffers, and async streams all extract the same way
//! - **Predictable** - One closed error taxonomy; no partial output from a rejected container
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use unarchive::unarchive;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Extracts into ./extension, derived from the archive name
//!     unarchive("extension.crx", None).await?;
//!
//!     // Buffers and streams need an explicit destination
//!     let data = std::fs::read("bundle.zip")?;
//!     unarchive(data, Some(std::path::Path::new("out"))).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! CRX containers (Chrome extensions) are recognized and their header is
//! stripped before ZIP extraction; [`crx_to_zip`] exposes that translation
//! on its own for callers that only need the ZIP view.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// CRX container translation
pub mod crx;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// Content-based file type resolution
pub mod sniff;
/// Core types
pub mod types;
/// Orchestration of classification, translation, and extraction
pub mod unarchiver;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use crx::{CRX_MAGIC, ZIP_MAGIC, crx_to_zip};
pub use error::{CrxError, Error, ExtractionError, Result};
pub use sniff::{classify_bytes, classify_path};
pub use types::{ArchiveFormat, ByteStream, FormatClassification, InputSource};
pub use unarchiver::{Unarchiver, unarchive};
