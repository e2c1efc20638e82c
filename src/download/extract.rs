//! Executable extraction from release archives
//!
//! `.tar.gz` assets are read with a deliberately narrow tar scanner: only the
//! entry name and size fields of each 512-byte header are interpreted. Type
//! flags, ownership and checksums are ignored, which is all the release
//! archives need. Windows `.zip` assets go through the `zip` crate.

use std::io::{Cursor, Read};

use log::debug;
use zip::ZipArchive;

use super::decompress::inflate;
use super::platform::{ArchiveFormat, ReleaseAsset};
use crate::error::InstallError;

pub const BLOCK_SIZE: usize = 512;

/// Leading path segment stripped from entry names
pub const PACKAGE_ROOT: &str = "package/";

const NAME_FIELD: (usize, usize) = (0, 100);
const SIZE_FIELD: (usize, usize) = (124, 12);

/// One regular-file entry located inside a raw tar buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Archive path with [`PACKAGE_ROOT`] removed
    pub name: String,
    pub size: u64,
    /// Start of content within the buffer
    pub offset: usize,
    /// Content bytes actually present (short if the buffer is truncated)
    pub len: usize,
}

impl ArchiveEntry {
    pub fn content<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.offset..self.offset + self.len]
    }
}

/// Sequential scan over header and data blocks of an uncompressed tar.
///
/// Headers whose size field is not octal yield nothing and advance the scan
/// by exactly one block, so later entries stay aligned as long as the
/// archive itself is block aligned.
pub struct TarScanner<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> TarScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }
}

impl Iterator for TarScanner<'_> {
    type Item = ArchiveEntry;

    fn next(&mut self) -> Option<ArchiveEntry> {
        while self.offset < self.buf.len() {
            let header_end = self.offset.saturating_add(BLOCK_SIZE).min(self.buf.len());
            let header = &self.buf[self.offset..header_end];
            let header_offset = self.offset;
            self.offset = self.offset.saturating_add(BLOCK_SIZE);

            let Some(size) = parse_octal(field(header, SIZE_FIELD)) else {
                debug!("Skipping tar header at {} with non-numeric size", header_offset);
                continue;
            };

            let size_bytes = usize::try_from(size).unwrap_or(usize::MAX);
            let start = self.offset.min(self.buf.len());
            let end = start.saturating_add(size_bytes).min(self.buf.len());
            let padded = size_bytes
                .checked_add(BLOCK_SIZE - 1)
                .map_or(usize::MAX, |n| n & !(BLOCK_SIZE - 1));
            self.offset = self.offset.saturating_add(padded);

            let name = null_terminated(field(header, NAME_FIELD));
            let name = name.strip_prefix(PACKAGE_ROOT).unwrap_or(&name).to_string();

            return Some(ArchiveEntry {
                name,
                size,
                offset: start,
                len: end - start,
            });
        }
        None
    }
}

/// Pull the asset's executable out of a downloaded archive.
pub fn extract_executable(bytes: &[u8], asset: &ReleaseAsset) -> Result<Vec<u8>, InstallError> {
    let name = asset.executable_name();
    match asset.archive_format() {
        ArchiveFormat::TarGz => {
            let raw = inflate(bytes)?;
            find_in_tar(&raw, name)
        }
        ArchiveFormat::Zip => find_in_zip(bytes, name),
    }
}

/// Content of the last tar entry named `name`.
pub fn find_in_tar(raw: &[u8], name: &str) -> Result<Vec<u8>, InstallError> {
    TarScanner::new(raw)
        .inspect(|entry| debug!("tar entry {} ({} bytes)", entry.name, entry.size))
        .filter(|entry| entry.name == name)
        .last()
        .map(|entry| entry.content(raw).to_vec())
        .ok_or_else(|| InstallError::ExecutableNotFound {
            name: name.to_string(),
        })
}

fn find_in_zip(bytes: &[u8], name: &str) -> Result<Vec<u8>, InstallError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut found = None;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let entry_name = file.name();
        debug!("zip entry {} ({} bytes)", entry_name, file.size());
        if entry_name.strip_prefix(PACKAGE_ROOT).unwrap_or(entry_name) != name {
            continue;
        }

        // Declared size comes from the archive; never reserve past its length
        let capacity = usize::try_from(file.size()).unwrap_or(0).min(bytes.len());
        let mut content = Vec::with_capacity(capacity);
        file.read_to_end(&mut content).map_err(InstallError::Decompress)?;
        found = Some(content);
    }

    found.ok_or_else(|| InstallError::ExecutableNotFound {
        name: name.to_string(),
    })
}

/// `len` bytes at `start`, clamped to what the header actually holds.
fn field(header: &[u8], (start, len): (usize, usize)) -> &[u8] {
    let start = start.min(header.len());
    let end = start.saturating_add(len).min(header.len());
    &header[start..end]
}

fn null_terminated(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Leading octal digits after optional whitespace; `None` when there are none.
fn parse_octal(bytes: &[u8]) -> Option<u64> {
    let text = null_terminated(bytes);
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| ('0'..='7').contains(c))
        .collect();
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(&digits, 8).ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::download::platform::resolve;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    /// Minimal tar header: name and octal size, everything else zeroed.
    pub(crate) fn header(name: &str, size_field: &[u8]) -> Vec<u8> {
        let mut block = vec![0u8; BLOCK_SIZE];
        block[..name.len()].copy_from_slice(name.as_bytes());
        block[124..124 + size_field.len()].copy_from_slice(size_field);
        block
    }

    pub(crate) fn tar_entry(name: &str, content: &[u8]) -> Vec<u8> {
        let size = format!("{:011o}\0", content.len());
        let mut out = header(name, size.as_bytes());
        out.extend_from_slice(content);
        let padding = (BLOCK_SIZE - content.len() % BLOCK_SIZE) % BLOCK_SIZE;
        out.extend(std::iter::repeat_n(0u8, padding));
        out
    }

    pub(crate) fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut tar = Vec::new();
        for (name, content) in entries {
            tar.extend(tar_entry(name, content));
        }
        // end-of-archive marker
        tar.extend(std::iter::repeat_n(0u8, BLOCK_SIZE * 2));

        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&tar).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn single_entry_round_trip() {
        let buf = tar_entry("package/tool", b"hello");
        assert_eq!(buf.len(), 2 * BLOCK_SIZE);

        let entries: Vec<_> = TarScanner::new(&buf).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "tool");
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[0].content(&buf), b"hello");
    }

    #[test]
    fn non_numeric_size_advances_one_block() {
        let mut buf = header("package/garbage", b"not-octal\0");
        buf.extend(tar_entry("package/tool", b"hello"));

        let entries: Vec<_> = TarScanner::new(&buf).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "tool");
        assert_eq!(entries[0].offset, 2 * BLOCK_SIZE);
        assert_eq!(entries[0].content(&buf), b"hello");
    }

    #[test]
    fn content_padded_to_block_boundary() {
        let big = vec![7u8; 513];
        let mut buf = tar_entry("package/first", &big);
        buf.extend(tar_entry("package/second", b"x"));

        let entries: Vec<_> = TarScanner::new(&buf).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].len, 513);
        // header + two data blocks
        assert_eq!(entries[1].offset, 4 * BLOCK_SIZE);
        assert_eq!(entries[1].content(&buf), b"x");
    }

    #[test]
    fn zero_blocks_yield_nothing() {
        let buf = vec![0u8; BLOCK_SIZE * 2];
        assert_eq!(TarScanner::new(&buf).count(), 0);
    }

    #[test]
    fn truncated_content_is_clamped() {
        let mut buf = header("package/tool", b"00000000144\0");
        buf.extend_from_slice(b"short");

        let entries: Vec<_> = TarScanner::new(&buf).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size, 100);
        assert_eq!(entries[0].content(&buf), b"short");
    }

    #[test]
    fn names_without_package_root_kept() {
        let buf = tar_entry("new-dockerfile", b"bin");
        let entry = TarScanner::new(&buf).next().unwrap();
        assert_eq!(entry.name, "new-dockerfile");
    }

    #[test]
    fn octal_parsing() {
        assert_eq!(parse_octal(b"00000000005\0"), Some(5));
        assert_eq!(parse_octal(b"     1750 \0"), Some(1000));
        assert_eq!(parse_octal(b"12x"), Some(0o12));
        assert_eq!(parse_octal(b"\0\0\0"), None);
        assert_eq!(parse_octal(b"xyz"), None);
        assert_eq!(parse_octal(b"8"), None);
    }

    #[test]
    fn tar_gz_executable_is_found() {
        let archive = tar_gz(&[
            ("package/README.md", &b"docs"[..]),
            ("package/new-dockerfile", &b"\x7fELF binary"[..]),
        ]);
        let asset = resolve("linux", "x64", false).unwrap();
        assert_eq!(extract_executable(&archive, asset).unwrap(), b"\x7fELF binary");
    }

    #[test]
    fn missing_executable_reported() {
        let archive = tar_gz(&[("package/README.md", &b"docs"[..])]);
        let asset = resolve("darwin", "arm64", false).unwrap();
        match extract_executable(&archive, asset) {
            Err(InstallError::ExecutableNotFound { name }) => assert_eq!(name, "new-dockerfile"),
            other => panic!("expected ExecutableNotFound, got {other:?}"),
        }
    }

    #[test]
    fn last_matching_tar_entry_wins() {
        let mut raw = tar_entry("package/new-dockerfile", b"first");
        raw.extend(tar_entry("new-dockerfile", b"second"));

        assert_eq!(find_in_tar(&raw, "new-dockerfile").unwrap(), b"second");
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn zip_executable_is_found() {
        let bytes = zip_bytes(&[
            ("package/LICENSE", &b"MIT"[..]),
            ("package/new-dockerfile.exe", &b"MZ exe"[..]),
        ]);

        let asset = resolve("windows", "x64", false).unwrap();
        assert_eq!(extract_executable(&bytes, asset).unwrap(), b"MZ exe");
    }

    #[test]
    fn malformed_zip_is_zip_error() {
        let asset = resolve("windows", "arm64", false).unwrap();
        assert!(matches!(
            extract_executable(b"not a zip", asset),
            Err(InstallError::Zip(_))
        ));
    }

    #[test]
    fn zip_without_executable_reported() {
        let bytes = zip_bytes(&[("package/LICENSE", &b"MIT"[..])]);
        let asset = resolve("windows", "x64", false).unwrap();
        match extract_executable(&bytes, asset) {
            Err(InstallError::ExecutableNotFound { name }) => assert_eq!(name, "new-dockerfile.exe"),
            other => panic!("expected ExecutableNotFound, got {other:?}"),
        }
    }

    #[test]
    fn oversized_zip_size_field_is_not_trusted() {
        let mut bytes = zip_bytes(&[("new-dockerfile.exe", &b"MZ exe"[..])]);

        // Central directory record: uncompressed size lives at offset 24
        let central = bytes
            .windows(4)
            .position(|w| w == [0x50, 0x4b, 0x01, 0x02])
            .unwrap();
        bytes[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        let asset = resolve("windows", "x64", false).unwrap();
        assert_eq!(extract_executable(&bytes, asset).unwrap(), b"MZ exe");
    }
}
