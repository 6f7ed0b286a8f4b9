//! File-backed detection log.
//!
//! Implements [`DetectionSink`] by appending one line per detection to a
//! text file and flushing after every line:
//!
//! ```text
//! Intruder detected at 2024-03-07 09:05:02 - Distance: 25.46 cm
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::events::DetectionEvent;
use crate::app::ports::DetectionSink;

/// Append-only detection log.  The file handle is released on
/// [`close`](DetectionSink::close) or drop, whichever comes first.
pub struct FileDetectionLog {
    path: PathBuf,
    file: Option<File>,
}

impl FileDetectionLog {
    /// Open (creating if needed) `path` in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl DetectionSink for FileDetectionLog {
    fn record(&mut self, event: &DetectionEvent) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("detection log already closed"))?;
        writeln!(file, "{event}")?;
        file.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
            debug!("Closed detection log {}", self.path.display());
        }
        Ok(())
    }
}
