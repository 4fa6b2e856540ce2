//! Directory scanner for BDD archives.
//!
//! The directory starts at offset 0 and is a run of [`BddEntry`] records
//! laid out back to back. There is no entry count: the scan stops at the
//! first slot whose leading byte is zero, or at the end of the buffer.

use tracing::trace;

use crate::error::Result;

use super::structures::BddEntry;

/// Parser over an archive held entirely in memory.
///
/// Typically used through [`BddExtractor`](super::BddExtractor) rather than
/// directly.
pub struct BddParser {
    data: Vec<u8>,
}

impl BddParser {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode every directory entry in archive order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedRecord`](crate::Error::TruncatedRecord) if a
    /// non-zero slot starts less than [`BddEntry::SIZE`] bytes before the end
    /// of the buffer.
    pub fn list_files(&self) -> Result<Vec<BddEntry>> {
        let mut entries = Vec::new();
        let mut offset = 0;

        while offset < self.data.len() && self.data[offset] != 0 {
            let entry = BddEntry::from_bytes(&self.data, offset)?;
            trace!(offset, name = %entry.file_name(), "decoded directory entry");
            entries.push(entry);
            offset += BddEntry::SIZE;
        }

        Ok(entries)
    }

    /// Payload bytes of `entry`, bounds checked against the archive.
    pub fn payload(&self, entry: &BddEntry) -> Result<&[u8]> {
        let range = entry.payload_range(self.data.len())?;
        Ok(&self.data[range])
    }
}
