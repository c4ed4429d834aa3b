//! Core types for unarchive

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

/// Boxed async byte stream accepted as archive input
///
/// Streams are consumed at most once; draining one is destructive, so a
/// stream must not be reused across calls.
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Input material for an unarchive operation
///
/// Tagged union over the three input shapes, with one extraction strategy
/// per tag. Constructed by the caller (usually through a `From` conversion)
/// and consumed once by the orchestrator.
pub enum InputSource {
    /// Path to an archive file on disk
    Path(PathBuf),
    /// Archive contents already held in memory
    Buffer(Vec<u8>),
    /// Readable byte stream
    Stream(ByteStream),
}

impl InputSource {
    /// Wrap an async reader as a stream input
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// The source path, when the input is a file on disk
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Buffer(data) => f.debug_tuple("Buffer").field(&data.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for InputSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for InputSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for InputSource {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Buffer(data)
    }
}

impl From<&[u8]> for InputSource {
    fn from(data: &[u8]) -> Self {
        Self::Buffer(data.to_vec())
    }
}

/// Best-guess classification of an input's format
///
/// Produced once per invocation by the type resolver; never mutated. Both
/// labels are absent when the content matched no known magic bytes.
/// Absence is not fatal: the orchestrator falls through to its default
/// branch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatClassification {
    /// Canonical extension label (e.g. "zip", "tar.gz", "crx"), when recognized
    pub extension: Option<String>,
    /// MIME type label (e.g. "application/zip"), when recognized
    pub mime: Option<String>,
}

impl FormatClassification {
    /// Classification for content that matched no known magic bytes
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether the content matched no known magic bytes
    pub fn is_unknown(&self) -> bool {
        self.extension.is_none() && self.mime.is_none()
    }

    pub(crate) fn known(extension: &str, mime: &str) -> Self {
        Self {
            extension: Some(extension.to_string()),
            mime: Some(mime.to_string()),
        }
    }
}

/// Mode selector for the archive extractor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// ZIP archive (also the payload format inside a CRX container)
    Zip,
    /// Uncompressed tarball
    Tar,
    /// Bare gzip member holding a single file
    Gzip,
    /// Gzip-compressed tarball
    TarGzip,
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zip => "ZIP",
            Self::Tar => "TAR",
            Self::Gzip => "GZIP",
            Self::TarGzip => "TAR+GZIP",
        };
        write!(f, "{}", name)
    }
}
