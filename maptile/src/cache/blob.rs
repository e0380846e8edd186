//! Blob files on disk.
//!
//! Layout: `<root>/<vendor>/<zoom>/<x>_<y>.jpeg`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tile::Tile;

/// Encoded tile images stored as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

/// Files and bytes held by a [`BlobStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobUsage {
    pub files: u64,
    pub bytes: u64,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob for a tile.
    pub fn path_for(&self, vendor: &str, tile: &Tile) -> PathBuf {
        self.root
            .join(vendor_dir(vendor))
            .join(tile.z.to_string())
            .join(tile.blob_name())
    }

    pub fn read(&self, vendor: &str, tile: &Tile) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(vendor, tile))
    }

    /// Write the blob, creating parent directories as needed.
    pub fn write(&self, vendor: &str, tile: &Tile, data: &[u8]) -> io::Result<()> {
        let path = self.path_for(vendor, tile);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)
    }

    /// Walk every vendor directory and total up the blobs.
    pub fn usage(&self) -> io::Result<BlobUsage> {
        let mut usage = BlobUsage::default();
        for vendor in vendor_dirs(&self.root)? {
            walk(&vendor, &mut usage)?;
        }
        Ok(usage)
    }

    /// Remove every vendor directory. Returns what was removed.
    pub fn clear(&self) -> io::Result<BlobUsage> {
        let usage = self.usage()?;
        for vendor in vendor_dirs(&self.root)? {
            fs::remove_dir_all(vendor)?;
        }
        Ok(usage)
    }
}

/// Directory name for a vendor id.
///
/// Bytes outside `[A-Za-z0-9_-]` are percent-encoded, so distinct ids map to
/// distinct directories and no id can escape the cache root. The empty id
/// maps to a lone `%`, which no non-empty id can produce.
fn vendor_dir(vendor: &str) -> String {
    if vendor.is_empty() {
        return "%".to_string();
    }
    let mut dir = String::with_capacity(vendor.len());
    for byte in vendor.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_') {
            dir.push(char::from(byte));
        } else {
            dir.push_str(&format!("%{:02X}", byte));
        }
    }
    dir
}

fn vendor_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

fn walk(dir: &Path, usage: &mut BlobUsage) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(&entry.path(), usage)?;
        } else if file_type.is_file() {
            usage.files += 1;
            usage.bytes += entry.metadata()?.len();
        }
    }
    Ok(())
}
