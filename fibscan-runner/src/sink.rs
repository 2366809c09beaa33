//! Signal history sink — append-only CSV, one row per emitted signal.
//!
//! The header row is written only when the file is new or empty; every later
//! append adds a single data row. Columns: `time,symbol,type,price,reason`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

use fibscan_core::domain::SignalRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("record sink I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("record sink CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for flattened signal rows.
pub trait RecordSink: Send {
    fn append(&mut self, record: &SignalRecord) -> Result<(), SinkError>;
}

/// Append-only CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvRecordSink {
    path: PathBuf,
}

impl CsvRecordSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_err(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordSink for CsvRecordSink {
    fn append(&mut self, record: &SignalRecord) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(self.io_err(e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(|e| self.io_err(e))?;
        Ok(())
    }
}
