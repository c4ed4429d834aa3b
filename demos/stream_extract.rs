//! Stream extraction example
//!
//! This example demonstrates extracting from an async byte stream:
//! - Wrapping any `AsyncRead` as an input source
//! - Capping in-memory buffering for formats that need random access
//! - Explicit destinations for nameless inputs

use std::path::Path;
use unarchive::{Config, InputSource, Unarchiver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Cap in-memory buffering at 64 MiB. The cap applies to CRX and ZIP
    // content, which need random access; TAR and GZIP content streams
    // through without full materialization.
    let unarchiver = Unarchiver::new(Config {
        max_stream_buffer_bytes: Some(64 * 1024 * 1024),
        ..Config::default()
    });

    let file = tokio::fs::File::open("bundle.tar.gz").await?;

    // Streams carry no name, so a destination is required
    unarchiver
        .unarchive(InputSource::stream(file), Some(Path::new("out")))
        .await?;

    println!("Extracted bundle.tar.gz into out/");

    Ok(())
}
