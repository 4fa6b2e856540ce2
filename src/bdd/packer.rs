//! Archive builder.
//!
//! Packing happens in three steps:
//! 1. Stat every input and build its directory entry
//! 2. Lay out payloads after the directory at 16-byte-aligned offsets
//! 3. Encode the directory, copy the payloads, write the buffer once

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, PathContext, Result};

use super::filetime;
use super::structures::{BddEntry, align_up, directory_size};

/// Builds a BDD archive from an ordered list of files
#[derive(Debug, Default)]
pub struct BddPacker {
    files: Vec<PathBuf>,
}

impl BddPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a file. Directory order follows insertion order.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    /// Directory entries with offsets assigned, plus the total archive size
    pub async fn plan(&self) -> Result<(Vec<BddEntry>, usize)> {
        let mut entries = Vec::with_capacity(self.files.len());
        for path in &self.files {
            entries.push(describe_file(path).await?);
        }

        let size = assign_offsets(&mut entries)?;
        Ok((entries, size))
    }

    /// Assemble the complete archive in memory
    pub async fn build(&self) -> Result<Vec<u8>> {
        let (entries, size) = self.plan().await?;
        let mut buf = vec![0u8; size];

        for (index, entry) in entries.iter().enumerate() {
            entry.write_to(&mut buf, index * BddEntry::SIZE)?;
        }

        for (path, entry) in self.files.iter().zip(&entries) {
            let range = entry.payload_range(buf.len())?;
            let data = fs::read(path).await.with_path(path)?;
            if data.len() != range.len() {
                return Err(Error::SizeChanged {
                    path: path.clone(),
                    expected: range.len(),
                    actual: data.len(),
                });
            }
            buf[range].copy_from_slice(&data);
            debug!(
                path = %path.display(),
                offset = entry.offset,
                length = entry.length,
                "packed"
            );
        }

        Ok(buf)
    }

    /// Build the archive and write it to `output`, creating parent directories
    pub async fn write(&self, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_path(parent)?;
            }
        }

        let buf = self.build().await?;
        fs::write(output, &buf).await.with_path(output)?;

        info!(
            files = self.files.len(),
            size = buf.len(),
            output = %output.display(),
            "packed archive"
        );
        Ok(())
    }
}

/// Directory entry for `path` with its offset left at zero.
///
/// The name is the file stem and the extension is taken without its dot,
/// both truncated to their field widths.
async fn describe_file(path: &Path) -> Result<BddEntry> {
    let metadata = fs::metadata(path).await.with_path(path)?;

    let length = metadata.len();
    let length = i32::try_from(length).map_err(|_| Error::ArchiveTooLarge(length))?;
    let modified = metadata.modified().with_path(path)?;
    let file_time = filetime::from_system_time(modified)?;

    let name = path.file_stem().map(|s| s.as_encoded_bytes()).unwrap_or_default();
    let extension = path.extension().map(|s| s.as_encoded_bytes()).unwrap_or_default();

    Ok(BddEntry::new(name, extension, 0, length, file_time))
}

/// Place each payload after the directory region and return the archive size.
///
/// Every offset is the previous entry's end rounded up to 16, and the archive
/// itself ends on a 16-byte boundary.
pub fn assign_offsets(entries: &mut [BddEntry]) -> Result<usize> {
    let mut position = directory_size(entries.len());

    for entry in entries.iter_mut() {
        entry.offset = i32::try_from(position).map_err(|_| Error::ArchiveTooLarge(position))?;
        let end = u64::try_from(entry.length)
            .ok()
            .and_then(|length| position.checked_add(length))
            .ok_or_else(|| Error::OutOfBounds {
                name: entry.file_name(),
                offset: entry.offset,
                length: entry.length,
                archive_len: position as usize,
            })?;
        position = align_up(end);
    }

    if position > i32::MAX as u64 {
        return Err(Error::ArchiveTooLarge(position));
    }

    Ok(position as usize)
}
