use std::fs::FileTimes;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{Error, PathContext, Result};

use super::parser::BddParser;
use super::structures::BddEntry;

/// BDD archive extractor
pub struct BddExtractor {
    parser: BddParser,
}

impl BddExtractor {
    /// Wrap an archive already loaded into memory
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            parser: BddParser::new(data),
        }
    }

    /// Read the whole archive at `path` into memory
    pub async fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).await.with_path(path)?;
        debug!(path = %path.display(), size = data.len(), "loaded archive");
        Ok(Self::new(data))
    }

    /// List all files in the archive
    pub fn list_files(&self) -> Result<Vec<BddEntry>> {
        self.parser.list_files()
    }

    /// Payload of a single entry
    pub fn extract_to_memory(&self, entry: &BddEntry) -> Result<&[u8]> {
        self.parser.payload(entry)
    }

    /// Write one entry to `output_path` and stamp it with the entry's file time
    pub async fn extract_to_file(&self, entry: &BddEntry, output_path: &Path) -> Result<()> {
        let data = self.extract_to_memory(entry)?;
        let modified = entry.modified()?;

        let mut file = fs::File::create(output_path).await.with_path(output_path)?;
        file.write_all(data).await.with_path(output_path)?;
        file.flush().await.with_path(output_path)?;

        let file = file.into_std().await;
        file.set_times(file_times(modified)).with_path(output_path)?;

        Ok(())
    }

    /// Extract every entry into `output_dir`, creating it if needed.
    ///
    /// Entries that map to the same file name overwrite each other in archive
    /// order. Returns the number of files written.
    pub async fn unpack_to(&self, output_dir: &Path) -> Result<usize> {
        fs::create_dir_all(output_dir).await.with_path(output_dir)?;

        let entries = self.list_files()?;
        let output_paths = entries
            .iter()
            .map(|entry| output_path(output_dir, entry))
            .collect::<Result<Vec<_>>>()?;

        for (entry, output_path) in entries.iter().zip(&output_paths) {
            debug!(
                name = %entry.file_name(),
                offset = entry.offset,
                length = entry.length,
                "extracting"
            );
            self.extract_to_file(entry, output_path).await?;
        }

        info!(
            files = entries.len(),
            output = %output_dir.display(),
            "unpacked archive"
        );
        Ok(entries.len())
    }
}

/// Path of `entry` inside `output_dir`.
///
/// The decoded name must be a single normal path component, so an archive
/// cannot place files outside `output_dir`.
fn output_path(output_dir: &Path, entry: &BddEntry) -> Result<PathBuf> {
    let name = entry.file_name();
    let invalid = || Error::InvalidName { name: name.clone() };

    if name.contains(['/', '\\']) {
        return Err(invalid());
    }

    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(output_dir.join(&name)),
        _ => Err(invalid()),
    }
}

/// Creation time is only settable on Windows and macOS; elsewhere only the
/// modification time is restored.
fn file_times(time: SystemTime) -> FileTimes {
    let times = FileTimes::new().set_modified(time);

    #[cfg(windows)]
    let times = {
        use std::os::windows::fs::FileTimesExt;
        times.set_created(time)
    };

    #[cfg(target_os = "macos")]
    let times = {
        use std::os::macos::fs::FileTimesExt;
        times.set_created(time)
    };

    times
}
