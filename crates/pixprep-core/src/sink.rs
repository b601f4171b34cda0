//! Output sinks: where converted images, charts and sample grids end up.
//!
//! Pipeline stages never touch the filesystem directly for output. They write
//! named files into an [`OutputSink`], which is either a directory on disk
//! ([`FsSink`]) or an in-memory map ([`MemorySink`]) for tests.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// A flat destination directory for named output files.
pub trait OutputSink {
    /// Location files are written under, used for paths and log messages.
    fn location(&self) -> &Path;

    /// Make sure the destination exists. Idempotent.
    fn prepare(&mut self) -> io::Result<()>;

    /// Remove everything previously written, leaving an empty destination.
    fn clear(&mut self) -> io::Result<()>;

    /// Write `bytes` under `name`, overwriting any existing file.
    ///
    /// Returns the full path of the written file.
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Sink backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    /// Create a sink writing into `root`. Nothing is created until
    /// [`OutputSink::prepare`] or [`OutputSink::write`] is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputSink for FsSink {
    fn location(&self) -> &Path {
        &self.root
    }

    fn prepare(&mut self) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.root.exists() {
            tracing::debug!("Clearing output directory {:?}", self.root);
            std::fs::remove_dir_all(&self.root)?;
        }
        std::fs::create_dir_all(&self.root)
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Sink that keeps written files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    root: PathBuf,
    files: BTreeMap<String, Vec<u8>>,
    clears: usize,
}

impl MemorySink {
    /// Create an empty in-memory sink reporting paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Bytes written under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Names of all files currently held, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    /// Number of files currently held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are held.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// How many times the sink has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl OutputSink for MemorySink {
    fn location(&self) -> &Path {
        &self.root
    }

    fn prepare(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.files.clear();
        self.clears += 1;
        Ok(())
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(self.root.join(name))
    }
}
