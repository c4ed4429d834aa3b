//! Configuration types for unarchive

use serde::{Deserialize, Serialize};

/// Configuration for an [`Unarchiver`](crate::Unarchiver)
///
/// All fields have serde defaults, so a partial configuration file
/// deserializes into a fully populated `Config`. `Config::default()`
/// matches the serde defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Cap on in-memory stream materialization, in bytes (default: 1 GiB)
    ///
    /// Stream inputs are fully buffered when the dispatch target needs
    /// random access (CRX translation, ZIP extraction). Draining beyond
    /// this cap fails with [`Error::StreamTooLarge`](crate::Error::StreamTooLarge)
    /// so a hostile unbounded stream cannot exhaust memory. `None` disables
    /// the cap.
    #[serde(default = "default_max_stream_buffer_bytes")]
    pub max_stream_buffer_bytes: Option<u64>,

    /// Prefix length read for content classification, in bytes (default: 8192)
    ///
    /// Must cover the deepest magic offset the type resolver probes: the
    /// tar magic sits at byte 257, and the gzip-payload probe needs enough
    /// compressed input to decode 262 bytes.
    #[serde(default = "default_sniff_buffer_bytes")]
    pub sniff_buffer_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stream_buffer_bytes: default_max_stream_buffer_bytes(),
            sniff_buffer_bytes: default_sniff_buffer_bytes(),
        }
    }
}

fn default_max_stream_buffer_bytes() -> Option<u64> {
    Some(1024 * 1024 * 1024)
}

fn default_sniff_buffer_bytes() -> usize {
    8192
}
