//! High-level API for writing an ingested log out as CSV.

use crate::error::{Error, Result};
use crate::formatter::CsvFormatter;
use crate::models::Log;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer for emitting a [`Log`] as normalized CSV.
///
/// The destination failing to open is the only hard failure in the whole
/// pipeline; everything on the ingestion side is absorbed silently.
///
/// # Examples
///
/// ```no_run
/// use trionic_parser::{CsvWriter, LogReader};
///
/// // Read a Trionic log file
/// let reader = LogReader::from_file("session.t5l")?;
/// let log = reader.read_all();
///
/// // Write to CSV
/// CsvWriter::new("session.csv").write(&log)?;
/// # Ok::<(), trionic_parser::Error>(())
/// ```
pub struct CsvWriter {
    output_path: PathBuf,
}

impl CsvWriter {
    /// Create a new CSV writer that will write to the specified path.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Write the log to CSV.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be opened for writing, or
    /// if writing to it fails part-way.
    pub fn write(self, log: &Log) -> Result<()> {
        self.write_with_stats(log)?;
        Ok(())
    }

    /// Write the log to CSV and return statistics about the emission.
    pub fn write_with_stats(self, log: &Log) -> Result<WriteStats> {
        let file = File::create(&self.output_path).map_err(|err| {
            Error::OutputError(format!(
                "cannot open {} for writing: {}",
                self.output_path.display(),
                err
            ))
        })?;
        let mut out = BufWriter::new(file);

        let formatter = CsvFormatter::new(log);
        let num_records = formatter.write_csv(&mut out)?;
        out.flush()?;

        Ok(WriteStats {
            num_records,
            num_skipped: log.record_count() - num_records,
            num_columns: formatter.column_count(),
        })
    }
}

/// Statistics about a CSV emission.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Number of record rows written
    pub num_records: usize,
    /// Records dropped by the out-of-range sensor skip rule
    pub num_skipped: usize,
    /// Channel columns that survived selection (excluding "Time")
    pub num_columns: usize,
}

impl WriteStats {
    /// Get a human-readable summary of the emission.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} record(s) across {} column(s) ({} skipped)",
            self.num_records, self.num_columns, self.num_skipped
        )
    }
}
