//! CRX container translation
//!
//! Chrome extension packages (CRX) are a small binary header followed by an
//! ordinary ZIP archive. [`crx_to_zip`] validates the header and returns the
//! ZIP payload as a zero-copy view into the input buffer, handling both the
//! v2 layout (public-key and signature lengths at offsets 8 and 12) and the
//! v3 layout (a single header size at offset 8). All header integers are
//! 32-bit little-endian.

use crate::error::CrxError;
use tracing::trace;

/// Magic bytes opening a CRX container (`"Cr24"`)
pub const CRX_MAGIC: [u8; 4] = [0x43, 0x72, 0x32, 0x34];

/// Magic bytes opening a ZIP local file header
pub const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Minimum byte length of any CRX header (magic + version + one u32 field)
const MIN_HEADER_LEN: usize = 12;

/// Byte length of a full v2 header (magic + version + pubKeyLen + sigLen)
const V2_HEADER_LEN: usize = 16;

/// Parsed CRX header fields; exists only while translating one buffer
struct CrxHeader {
    version: u32,
    zip_start: usize,
}

impl CrxHeader {
    /// Parse and validate the CRX header at the front of `buf`
    ///
    /// The offset arithmetic runs in u64 so hostile length fields cannot
    /// wrap around; an overflowing sum is reported as exceeding file size.
    fn parse(buf: &[u8]) -> Result<Self, CrxError> {
        if buf.len() < MIN_HEADER_LEN {
            return Err(CrxError::FileTooSmall);
        }
        if buf[..4] != CRX_MAGIC {
            return Err(CrxError::InvalidMagic {
                found: [buf[0], buf[1], buf[2], buf[3]],
            });
        }

        let version = read_u32_le(buf, 4);
        let zip_start = match version {
            2 => {
                if buf.len() < V2_HEADER_LEN {
                    return Err(CrxError::V2HeaderTooSmall);
                }
                let pub_key_len = read_u32_le(buf, 8);
                let sig_len = read_u32_le(buf, 12);
                V2_HEADER_LEN as u64 + u64::from(pub_key_len) + u64::from(sig_len)
            }
            3 => {
                let header_size = read_u32_le(buf, 8);
                MIN_HEADER_LEN as u64 + u64::from(header_size)
            }
            other => return Err(CrxError::UnsupportedVersion { version: other }),
        };

        // Strict bound: an offset leaving zero payload bytes is rejected
        if zip_start >= buf.len() as u64 {
            return Err(CrxError::OffsetExceedsFileSize);
        }

        Ok(Self {
            version,
            zip_start: zip_start as usize,
        })
    }
}

/// Translate a CRX container into its ZIP payload
///
/// Validates the CRX header and returns the ZIP payload as a borrowed view
/// into `buf`; the success path never copies. A buffer that already starts
/// with ZIP magic is returned unchanged, so translating twice is a no-op.
/// The returned view is not itself validated as ZIP content; that is the
/// extractor's concern.
///
/// # Arguments
///
/// * `buf` - The complete CRX (or ZIP) file contents
///
/// # Returns
///
/// Returns the ZIP payload view, or a [`CrxError`] describing precisely why
/// the header could not be validated. Translation never partially succeeds.
///
/// # Examples
///
/// ```
/// use unarchive::crx::{crx_to_zip, CRX_MAGIC, ZIP_MAGIC};
///
/// // v3 container: magic, version 3, header size 0, then the payload
/// let mut crx = Vec::new();
/// crx.extend_from_slice(&CRX_MAGIC);
/// crx.extend_from_slice(&3u32.to_le_bytes());
/// crx.extend_from_slice(&0u32.to_le_bytes());
/// crx.extend_from_slice(&ZIP_MAGIC);
///
/// let zip = crx_to_zip(&crx)?;
/// assert_eq!(zip, ZIP_MAGIC);
/// # Ok::<(), unarchive::CrxError>(())
/// ```
pub fn crx_to_zip(buf: &[u8]) -> Result<&[u8], CrxError> {
    if buf.starts_with(&ZIP_MAGIC) {
        return Ok(buf);
    }

    let header = CrxHeader::parse(buf)?;
    trace!(
        version = header.version,
        zip_start = header.zip_start,
        "stripping CRX header"
    );
    Ok(&buf[header.zip_start..])
}

/// Read a little-endian u32 at `offset`; callers guarantee the bounds
fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}
