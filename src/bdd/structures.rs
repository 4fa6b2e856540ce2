use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::time::SystemTime;

use crate::error::{Error, Result};

use super::filetime;

/// Width of the zero-padded name field
pub const NAME_LEN: usize = 20;

/// Width of the zero-padded extension field
pub const EXTENSION_LEN: usize = 8;

/// Payload offsets and the end of the directory region are aligned to this
pub const ALIGNMENT: u64 = 0x10;

/// Round `value` up to the next multiple of [`ALIGNMENT`].
pub fn align_up(value: u64) -> u64 {
    (value + (ALIGNMENT - 1)) & !(ALIGNMENT - 1)
}

/// Size of the directory region for `count` entries.
///
/// One extra byte is reserved so a zero terminator always follows the last
/// entry, then the region is rounded up to [`ALIGNMENT`].
pub fn directory_size(count: usize) -> u64 {
    align_up((BddEntry::SIZE * count + 1) as u64)
}

/// BDD directory entry - 44 bytes
///
/// ```text
///  0..20  name       zero padded
/// 20..28  extension  zero padded
/// 28..32  offset     i32 LE
/// 32..36  length     i32 LE
/// 36..44  file_time  i64 LE, FILETIME ticks
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BddEntry {
    pub name: [u8; NAME_LEN],
    pub extension: [u8; EXTENSION_LEN],
    pub offset: i32,
    pub length: i32,
    pub file_time: i64,
}

impl BddEntry {
    pub const SIZE: usize = NAME_LEN + EXTENSION_LEN + 4 + 4 + 8;

    /// Build an entry, truncating `name` and `extension` to their field widths.
    ///
    /// Truncation is byte-level and may split a multi-byte UTF-8 sequence.
    pub fn new(name: &[u8], extension: &[u8], offset: i32, length: i32, file_time: i64) -> Self {
        Self {
            name: fixed_field(name),
            extension: fixed_field(extension),
            offset,
            length,
            file_time,
        }
    }

    /// Decode the record starting at `offset` in `data`.
    pub fn from_bytes(data: &[u8], offset: usize) -> Result<Self> {
        let record = data
            .get(offset..)
            .and_then(|rest| rest.get(..Self::SIZE))
            .ok_or(Error::TruncatedRecord {
                offset,
                available: data.len().saturating_sub(offset),
            })?;

        let mut cursor = Cursor::new(record);
        let mut name = [0u8; NAME_LEN];
        cursor.read_exact(&mut name)?;
        let mut extension = [0u8; EXTENSION_LEN];
        cursor.read_exact(&mut extension)?;

        Ok(Self {
            name,
            extension,
            offset: cursor.read_i32::<LittleEndian>()?,
            length: cursor.read_i32::<LittleEndian>()?,
            file_time: cursor.read_i64::<LittleEndian>()?,
        })
    }

    /// Encode the record into `buf` starting at `offset`.
    pub fn write_to(&self, buf: &mut [u8], offset: usize) -> Result<()> {
        let available = buf.len().saturating_sub(offset);
        let record = buf
            .get_mut(offset..)
            .and_then(|rest| rest.get_mut(..Self::SIZE))
            .ok_or(Error::TruncatedRecord { offset, available })?;

        let mut cursor = Cursor::new(record);
        cursor.write_all(&self.name)?;
        cursor.write_all(&self.extension)?;
        cursor.write_i32::<LittleEndian>(self.offset)?;
        cursor.write_i32::<LittleEndian>(self.length)?;
        cursor.write_i64::<LittleEndian>(self.file_time)?;
        Ok(())
    }

    /// Name bytes up to the first zero
    pub fn name_bytes(&self) -> &[u8] {
        terminate(&self.name)
    }

    /// Extension bytes up to the first zero
    pub fn extension_bytes(&self) -> &[u8] {
        terminate(&self.extension)
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    pub fn extension(&self) -> String {
        String::from_utf8_lossy(self.extension_bytes()).into_owned()
    }

    /// Output file name, always `name.extension` even when the extension is empty
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name(), self.extension())
    }

    /// Byte range of the payload within an archive of `archive_len` bytes.
    pub fn payload_range(&self, archive_len: usize) -> Result<Range<usize>> {
        let out_of_bounds = || Error::OutOfBounds {
            name: self.file_name(),
            offset: self.offset,
            length: self.length,
            archive_len,
        };

        let start = usize::try_from(self.offset).map_err(|_| out_of_bounds())?;
        let length = usize::try_from(self.length).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(length).ok_or_else(out_of_bounds)?;
        if end > archive_len {
            return Err(out_of_bounds());
        }

        Ok(start..end)
    }

    /// Timestamp applied as both creation and modification time
    pub fn modified(&self) -> Result<SystemTime> {
        filetime::to_system_time(self.file_time)
    }
}

fn fixed_field<const N: usize>(value: &[u8]) -> [u8; N] {
    let mut field = [0u8; N];
    let len = value.len().min(N);
    field[..len].copy_from_slice(&value[..len]);
    field
}

fn terminate(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(len) => &field[..len],
        None => field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout() {
        let entry = BddEntry::new(b"hello", b"txt", 0x30, 5, 0x0102_0304_0506_0708);
        let mut buf = vec![0xAAu8; BddEntry::SIZE + 4];
        entry.write_to(&mut buf, 4).unwrap();

        assert_eq!(BddEntry::SIZE, 44);
        assert_eq!(&buf[..4], &[0xAA; 4]);
        assert_eq!(&buf[4..9], b"hello");
        assert!(buf[9..24].iter().all(|&b| b == 0));
        assert_eq!(&buf[24..27], b"txt");
        assert!(buf[27..32].iter().all(|&b| b == 0));
        assert_eq!(&buf[32..36], &[0x30, 0, 0, 0]);
        assert_eq!(&buf[36..40], &[5, 0, 0, 0]);
        assert_eq!(&buf[40..48], &[8, 7, 6, 5, 4, 3, 2, 1]);

        assert_eq!(BddEntry::from_bytes(&buf, 4).unwrap(), entry);
    }

    #[test]
    fn full_width_fields_have_no_terminator() {
        let entry = BddEntry::new(b"abcdefghijklmnopqrstuvwxyz", b"extension", 0, 0, 0);
        assert_eq!(entry.name_bytes(), b"abcdefghijklmnopqrst");
        assert_eq!(entry.extension_bytes(), b"extensio");
        assert_eq!(entry.file_name(), "abcdefghijklmnopqrst.extensio");
    }

    #[test]
    fn empty_extension_keeps_dot() {
        let entry = BddEntry::new(b"README", b"", 0, 0, 0);
        assert_eq!(entry.file_name(), "README.");
    }

    #[test]
    fn truncated_record() {
        let buf = [1u8; BddEntry::SIZE - 1];
        match BddEntry::from_bytes(&buf, 0) {
            Err(Error::TruncatedRecord { offset, available }) => {
                assert_eq!(offset, 0);
                assert_eq!(available, BddEntry::SIZE - 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut small = [0u8; 8];
        let entry = BddEntry::new(b"a", b"b", 0, 0, 0);
        assert!(matches!(
            entry.write_to(&mut small, 0),
            Err(Error::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn payload_range_checks_bounds() {
        let entry = BddEntry::new(b"data", b"bin", 64, 16, 0);
        assert_eq!(entry.payload_range(80).unwrap(), 64..80);
        assert!(matches!(
            entry.payload_range(79),
            Err(Error::OutOfBounds { archive_len: 79, .. })
        ));

        let negative = BddEntry::new(b"data", b"bin", -1, 16, 0);
        assert!(matches!(
            negative.payload_range(1024),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn alignment() {
        assert_eq!(align_up(0), 0);
        assert_eq!(align_up(1), 16);
        assert_eq!(align_up(16), 16);
        assert_eq!(align_up(17), 32);
        assert_eq!(directory_size(0), 16);
        assert_eq!(directory_size(1), 48);
        assert_eq!(directory_size(3), 144);
    }
}
