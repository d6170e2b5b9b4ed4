//! High-level API for reading Trionic log files.

use crate::datalog::{DateFormat, LogParser};
use crate::error::Result;
use crate::models::Log;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// A reader for Trionic datalogger text files (`.t5l` / `.t7l`).
///
/// # Examples
///
/// ```no_run
/// use trionic_parser::LogReader;
///
/// // Read from a file
/// let reader = LogReader::from_file("session.t5l")?;
/// let log = reader.read_all();
/// # Ok::<(), trionic_parser::Error>(())
/// ```
pub struct LogReader {
    text: String,
    date_format: Option<DateFormat>,
}

impl LogReader {
    /// Create a new log reader from a file path.
    ///
    /// The file is memory-mapped and decoded as text; bytes that are not
    /// valid UTF-8 are replaced rather than rejected, since ingestion is
    /// best-effort by contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            text: String::from_utf8_lossy(&mmap).into_owned(),
            date_format: None,
        })
    }

    /// Create a new log reader from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid UTF-8.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self {
            text: String::from_utf8(data)?,
            date_format: None,
        })
    }

    /// Create a new log reader from already-loaded text.
    pub fn from_string(text: String) -> Self {
        Self {
            text,
            date_format: None,
        }
    }

    /// Ingest the whole input into a [`Log`].
    ///
    /// Ingestion never fails: an input whose first line matches no known
    /// date layout simply yields a log with zero records.
    pub fn read_all(self) -> Log {
        let (log, _) = self.read_all_with_format();
        log
    }

    /// Ingest the whole input, also returning the date format that was
    /// locked from the first line (`None` if nothing was ingested).
    pub fn read_all_with_format(self) -> (Log, Option<DateFormat>) {
        let mut parser = match self.date_format {
            Some(format) => LogParser::with_format(format),
            None => LogParser::new(),
        };
        let log = parser.parse(&self.text);
        (log, parser.date_format())
    }
}

/// Builder for configuring log ingestion options.
///
/// # Examples
///
/// ```no_run
/// use trionic_parser::{DateFormat, LogReaderBuilder};
///
/// let reader = LogReaderBuilder::new()
///     .date_format(DateFormat::Dot)
///     .from_file("session.t5l")?;
/// let log = reader.read_all();
/// # Ok::<(), trionic_parser::Error>(())
/// ```
pub struct LogReaderBuilder {
    date_format: Option<DateFormat>,
}

impl LogReaderBuilder {
    /// Create a new reader builder with default options.
    pub fn new() -> Self {
        Self { date_format: None }
    }

    /// Pin the timestamp layout instead of detecting it from the first line.
    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.date_format = Some(format);
        self
    }

    /// Build a reader from a file path.
    pub fn from_file<P: AsRef<Path>>(self, path: P) -> Result<LogReader> {
        let mut reader = LogReader::from_file(path)?;
        reader.date_format = self.date_format;
        Ok(reader)
    }

    /// Build a reader from raw bytes.
    pub fn from_bytes(self, data: Vec<u8>) -> Result<LogReader> {
        let mut reader = LogReader::from_bytes(data)?;
        reader.date_format = self.date_format;
        Ok(reader)
    }

    /// Build a reader from already-loaded text.
    pub fn from_string(self, text: String) -> LogReader {
        let mut reader = LogReader::from_string(text);
        reader.date_format = self.date_format;
        reader
    }
}

impl Default for LogReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
