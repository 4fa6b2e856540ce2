//! BDD archive parsing, extraction and packing.
//!
//! ## Architecture
//!
//! - [`structures`]: the fixed-size directory entry and layout helpers
//! - [`filetime`]: FILETIME tick conversion
//! - [`parser`]: directory scan over an in-memory archive
//! - [`extractor`]: unpacking entries to disk
//! - [`packer`]: building an archive from files
//!
//! ## BDD Format Overview
//!
//! A BDD file consists of:
//! 1. A directory of 44-byte entries starting at offset 0, terminated by the
//!    first slot whose leading byte is zero. The region is `44 * count + 1`
//!    bytes rounded up to 16, so a terminator always exists.
//! 2. The payloads, each starting on a 16-byte boundary.
//!
//! All integers are little-endian. There is no header, magic number or
//! checksum.

mod extractor;
pub mod filetime;
mod packer;
mod parser;
mod structures;

pub use extractor::BddExtractor;
pub use packer::{BddPacker, assign_offsets};
pub use parser::BddParser;
pub use structures::*;
