//! Content-based file type resolution
//!
//! Classifies inputs by their magic bytes via the `infer` crate, never by
//! file name. One refinement is layered on top: `infer` labels every gzip
//! member as plain `gz`, so a small decompression probe looks for the tar
//! magic inside the member and upgrades the label to `tar.gz` on a match.

use crate::error::Result;
use crate::types::FormatClassification;
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Offset of the ustar magic within a tar header block
const TAR_MAGIC_OFFSET: usize = 257;

/// Bytes that must decode out of a gzip member to reach and test the tar magic
const TAR_PROBE_LEN: usize = TAR_MAGIC_OFFSET + 5;

/// Classify a byte buffer by its magic bytes
///
/// Returns [`FormatClassification::unknown`] when the content matches no
/// known format. The buffer should be the head of the input; the deepest
/// probe reaches byte 261 (the tar magic), so anything shorter can only
/// classify formats with shallower magic.
pub fn classify_bytes(head: &[u8]) -> FormatClassification {
    let Some(kind) = infer::get(head) else {
        return FormatClassification::unknown();
    };

    if kind.extension() == "gz" && gzip_holds_tar(head) {
        return FormatClassification {
            extension: Some("tar.gz".to_string()),
            mime: Some(kind.mime_type().to_string()),
        };
    }

    FormatClassification::known(kind.extension(), kind.mime_type())
}

/// Classify a file on disk by reading a bounded prefix
///
/// # Arguments
///
/// * `path` - The file to inspect
/// * `prefix_len` - How many bytes to read for classification
///
/// # Returns
///
/// Returns the classification, or an I/O error if the file cannot be read
/// (a missing file is an error here, not an unknown classification).
pub async fn classify_path(path: &Path, prefix_len: usize) -> Result<FormatClassification> {
    let mut file = tokio::fs::File::open(path).await?;
    let head = read_prefix(&mut file, prefix_len).await?;
    Ok(classify_bytes(&head))
}

/// Read up to `len` bytes from `reader`, stopping early at end of stream
pub(crate) async fn read_prefix<R>(reader: &mut R, len: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

/// True when the gzip member starting at `head` decompresses into tar content
fn gzip_holds_tar(head: &[u8]) -> bool {
    let mut probe = [0u8; TAR_PROBE_LEN];
    if GzDecoder::new(head).read_exact(&mut probe).is_err() {
        // Truncated or corrupt member, or a payload shorter than one tar
        // header block: not a tarball
        return false;
    }
    probe[TAR_MAGIC_OFFSET..] == *b"ustar"
}
