//! File discovery for finding source images in a directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ConvertConfig;
use crate::error::{PipelineError, PipelineResult};

/// Discovers source images directly inside a directory.
pub struct FileDiscovery {
    extension: String,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a discovery instance for the configured source extension.
    pub fn new(config: &ConvertConfig) -> Self {
        Self::with_extension(&config.source_extension)
    }

    /// Create a discovery instance matching `extension` (with or without a leading dot).
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    /// List all matching files directly inside `dir`, sorted by path.
    ///
    /// Subdirectories are not descended into. An empty result is not an error.
    pub fn discover(&self, dir: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        if !dir.is_dir() {
            return Err(PipelineError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Unreadable entry in {:?}: {}", dir, e);
                    // Matching entries stay in the run so validation records them.
                    if let Some(path) = e.path().filter(|p| self.is_supported(p)) {
                        files.push(DiscoveredFile {
                            path: path.to_path_buf(),
                            size: 0,
                        });
                    }
                    continue;
                }
            };
            let entry_path = entry.path();
            if entry_path.is_file() && self.is_supported(entry_path) {
                let size = match entry.metadata() {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        tracing::warn!("Cannot read metadata of {:?}: {}", entry_path, e);
                        0
                    }
                };
                files.push(DiscoveredFile {
                    path: entry_path.to_path_buf(),
                    size,
                });
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("Discovered {} source image(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file has the source extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase() == self.extension)
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
