//! # bddtool
//!
//! Pack and unpack BDD archives: a flat list of named files described by a
//! fixed-size directory, followed by the file payloads.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use bddtool::{BddExtractor, BddPacker};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> bddtool::Result<()> {
//!     let mut packer = BddPacker::new();
//!     packer.add_file("assets/title.png").add_file("assets/README");
//!     packer.write(Path::new("out/assets.bdd")).await?;
//!
//!     let extractor = BddExtractor::open(Path::new("out/assets.bdd")).await?;
//!     for entry in extractor.list_files()? {
//!         println!("{}", entry.file_name());
//!     }
//!     extractor.unpack_to(Path::new("out/assets")).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod bdd;
pub mod cli;
pub mod error;

pub use bdd::{BddEntry, BddExtractor, BddPacker, BddParser};
pub use cli::Cli;
pub use error::{Error, Result};
