//! Basic extraction example
//!
//! This example demonstrates the core functionality of unarchive:
//! - Classifying an archive by content, never by file name
//! - Deriving a destination directory from the archive name
//! - Transparent CRX-to-ZIP unwrapping

use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let archive = args
        .next()
        .ok_or("usage: basic_extract <archive> [destination]")?;
    let dest = args.next();

    // Without a destination the directory is derived from the archive
    // name: bundle.tar.gz extracts into bundle/
    unarchive::unarchive(archive.as_str(), dest.as_deref().map(Path::new)).await?;

    println!("Extracted {}", archive);

    Ok(())
}
