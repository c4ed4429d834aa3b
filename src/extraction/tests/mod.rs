use crate::error::{Error, ExtractionError};
use crate::extraction::*;
use crate::types::{ArchiveFormat, ByteStream};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a ZIP archive in memory containing the given files
fn zip_fixture(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ::zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Create a TAR archive in memory containing the given files
fn tar_fixture(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = ::tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = ::tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

/// Gzip-compress a byte buffer with no FNAME header field
fn gzip_fixture(content: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    std::io::Write::write_all(&mut encoder, content).unwrap();
    encoder.finish().unwrap()
}

/// Gzip-compress a byte buffer, recording `name` in the FNAME header field
fn gzip_fixture_named(name: &str, content: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::GzBuilder::new()
        .filename(name)
        .write(Vec::new(), flate2::Compression::default());
    std::io::Write::write_all(&mut encoder, content).unwrap();
    encoder.finish().unwrap()
}

/// Replace equal-length byte patterns in a buffer
fn patch_bytes(buf: &mut [u8], from: &[u8], to: &[u8]) {
    assert_eq!(from.len(), to.len());
    let mut i = 0;
    while i + from.len() <= buf.len() {
        if &buf[i..i + from.len()] == from {
            buf[i..i + from.len()].copy_from_slice(to);
            i += from.len();
        } else {
            i += 1;
        }
    }
}

/// Rename the first entry of a raw TAR buffer and fix up its header checksum
fn retag_first_tar_entry(tar: &mut [u8], name: &[u8]) {
    tar[..name.len()].copy_from_slice(name);
    // The checksum is computed with its own field read as eight spaces
    tar[148..156].copy_from_slice(b"        ");
    let sum: u32 = tar[..512].iter().map(|b| u32::from(*b)).sum();
    let field = format!("{:06o}\0 ", sum);
    tar[148..156].copy_from_slice(field.as_bytes());
}

/// Box an in-memory remainder as a stream input
fn stream_of(bytes: Vec<u8>) -> ByteStream {
    Box::new(Cursor::new(bytes))
}

/// Assert that an extracted file exists with the expected content
fn assert_file(path: &Path, content: &[u8]) {
    assert!(path.is_file(), "missing extracted file: {}", path.display());
    assert_eq!(std::fs::read(path).unwrap(), content);
}

// ---------------------------------------------------------------------------
// Buffer extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_extract_buffer_zip_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let buf = zip_fixture(&[
        ("readme.txt", b"hello from zip".as_slice()),
        ("nested/data.bin", &[0u8, 1, 2, 3]),
    ]);

    let files = extract_buffer(ArchiveFormat::Zip, buf, &dest).await.unwrap();
    assert_eq!(files.len(), 2);

    assert_file(&dest.join("readme.txt"), b"hello from zip");
    assert_file(&dest.join("nested/data.bin"), &[0u8, 1, 2, 3]);
}

#[tokio::test]
async fn test_extract_buffer_zip_reports_malformed() {
    let temp_dir = TempDir::new().unwrap();

    let err = extract_buffer(
        ArchiveFormat::Zip,
        b"PK\x03\x04 but not actually a zip".to_vec(),
        temp_dir.path(),
    )
    .await
    .unwrap_err();

    match err {
        Error::Extraction(ExtractionError::Malformed { format, .. }) => {
            assert_eq!(format, ArchiveFormat::Zip);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_extract_buffer_tar() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let buf = tar_fixture(&[
        ("a.txt", b"hello from tar".as_slice()),
        ("sub/b.txt", b"nested entry".as_slice()),
    ]);

    let files = extract_buffer(ArchiveFormat::Tar, buf, &dest).await.unwrap();
    assert_eq!(files.len(), 2);

    assert_file(&dest.join("a.txt"), b"hello from tar");
    assert_file(&dest.join("sub/b.txt"), b"nested entry");
}

#[tokio::test]
async fn test_extract_buffer_tar_gz() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let buf = gzip_fixture(&tar_fixture(&[("inner.txt", b"hello from tar.gz".as_slice())]));

    let files = extract_buffer(ArchiveFormat::TarGzip, buf, &dest)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);

    assert_file(&dest.join("inner.txt"), b"hello from tar.gz");
}

#[tokio::test]
async fn test_extract_buffer_tar_gz_reports_malformed() {
    let temp_dir = TempDir::new().unwrap();

    let err = extract_buffer(
        ArchiveFormat::TarGzip,
        b"this is not gzip data at all".to_vec(),
        temp_dir.path(),
    )
    .await
    .unwrap_err();

    match err {
        Error::Extraction(ExtractionError::Malformed { format, .. }) => {
            assert_eq!(format, ArchiveFormat::TarGzip);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_extract_buffer_gzip_without_name_falls_back_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let files = extract_buffer(ArchiveFormat::Gzip, gzip_fixture(b"raw member"), &dest)
        .await
        .unwrap();

    assert_eq!(files, vec![dest.join("file")]);
    assert_file(&dest.join("file"), b"raw member");
}

#[tokio::test]
async fn test_extract_buffer_gzip_uses_fname() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let buf = gzip_fixture_named("report.txt", b"hello from gzip");
    let files = extract_buffer(ArchiveFormat::Gzip, buf, &dest).await.unwrap();

    assert_eq!(files, vec![dest.join("report.txt")]);
    assert_file(&dest.join("report.txt"), b"hello from gzip");
}

#[tokio::test]
async fn test_gzip_fname_is_reduced_to_its_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    // Separators in FNAME must not produce subdirectories or escapes
    let buf = gzip_fixture_named("../deep/dir/report.txt", b"contents");
    let files = extract_buffer(ArchiveFormat::Gzip, buf, &dest).await.unwrap();

    assert_eq!(files, vec![dest.join("report.txt")]);
    assert!(!temp_dir.path().join("deep").exists());
}

// ---------------------------------------------------------------------------
// Path extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_extract_path_zip() {
    let temp_dir = TempDir::new().unwrap();
    let archive_path = temp_dir.path().join("bundle.zip");
    let dest = temp_dir.path().join("out");

    std::fs::write(&archive_path, zip_fixture(&[("a.txt", b"from disk".as_slice())])).unwrap();

    let files = extract_path(ArchiveFormat::Zip, &archive_path, &dest)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_file(&dest.join("a.txt"), b"from disk");
}

#[tokio::test]
async fn test_extract_path_gzip_names_after_source() {
    let temp_dir = TempDir::new().unwrap();
    let archive_path = temp_dir.path().join("logs.txt.gz");
    let dest = temp_dir.path().join("out");

    // No FNAME field, so the name comes from the source minus its .gz suffix
    std::fs::write(&archive_path, gzip_fixture(b"log line one\n")).unwrap();

    let files = extract_path(ArchiveFormat::Gzip, &archive_path, &dest)
        .await
        .unwrap();

    assert_eq!(files, vec![dest.join("logs.txt")]);
    assert_file(&dest.join("logs.txt"), b"log line one\n");
}

#[tokio::test]
async fn test_extract_path_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();

    let err = extract_path(
        ArchiveFormat::Tar,
        Path::new("/no/such/archive.tar"),
        temp_dir.path(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

// ---------------------------------------------------------------------------
// Traversal guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_zip_entry_escaping_dest_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let mut buf = zip_fixture(&[("AA/evil.txt", b"escape attempt".as_slice())]);
    patch_bytes(&mut buf, b"AA/evil.txt", b"../evil.txt");

    let files = extract_buffer(ArchiveFormat::Zip, buf, &dest).await.unwrap();
    assert!(files.is_empty());
    assert!(!temp_dir.path().join("evil.txt").exists());
}

#[tokio::test]
async fn test_tar_entry_escaping_dest_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let mut buf = tar_fixture(&[("AA/evil.txt", b"escape attempt".as_slice())]);
    retag_first_tar_entry(&mut buf, b"../evil.txt");

    let files = extract_buffer(ArchiveFormat::Tar, buf, &dest).await.unwrap();
    assert!(files.is_empty());
    assert!(!temp_dir.path().join("evil.txt").exists());
}

// ---------------------------------------------------------------------------
// Stream extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_extract_stream_tar_replays_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let bytes = tar_fixture(&[("streamed.txt", b"hello from a stream".as_slice())]);
    // Split mid-header to prove the prefix and remainder are stitched together
    let prefix = bytes[..300].to_vec();
    let rest = stream_of(bytes[300..].to_vec());

    let files = extract_stream(ArchiveFormat::Tar, prefix, rest, &dest)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_file(&dest.join("streamed.txt"), b"hello from a stream");
}

#[tokio::test]
async fn test_extract_stream_tar_gz() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let bytes = gzip_fixture(&tar_fixture(&[("inner.txt", b"compressed stream".as_slice())]));
    let prefix = bytes[..16.min(bytes.len())].to_vec();
    let rest = stream_of(bytes[16.min(bytes.len())..].to_vec());

    let files = extract_stream(ArchiveFormat::TarGzip, prefix, rest, &dest)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_file(&dest.join("inner.txt"), b"compressed stream");
}

#[tokio::test]
async fn test_extract_stream_zip_buffers_remainder() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("out");

    let bytes = zip_fixture(&[("z.txt", b"zip over a stream".as_slice())]);
    let prefix = bytes[..8].to_vec();
    let rest = stream_of(bytes[8..].to_vec());

    let files = extract_stream(ArchiveFormat::Zip, prefix, rest, &dest)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_file(&dest.join("z.txt"), b"zip over a stream");
}
