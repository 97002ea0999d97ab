use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::extract::ImagePatterns;

/// Filenames already present under the account's storage directories,
/// snapshotted once before a run starts.
///
/// The index is never updated while a run executes; images downloaded by
/// the run itself are tracked by the image queue's processed set instead,
/// so the run's own output is not re-fetched either.
#[derive(Debug, Default)]
pub struct LocalImageIndex {
    filenames: HashSet<String>,
}

impl LocalImageIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect the file names directly inside each given directory.
    /// Directories that do not exist yet are treated as empty.
    pub fn scan<P: AsRef<Path>>(dirs: &[P]) -> io::Result<Self> {
        let mut filenames = HashSet::new();
        for dir in dirs {
            let entries = match std::fs::read_dir(dir.as_ref()) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err),
            };
            for entry in entries {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    if let Some(name) = entry.file_name().to_str() {
                        filenames.insert(name.to_string());
                    }
                }
            }
        }
        Ok(Self { filenames })
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

/// Whether an image URL's stored filename already exists locally. URLs
/// without a recognizable filename are never considered saved.
pub fn is_already_saved(url: &str, patterns: &ImagePatterns, local: &LocalImageIndex) -> bool {
    patterns
        .filename_of(url)
        .map(|name| local.contains(name))
        .unwrap_or(false)
}
