//! # Trionic Parser
//!
//! A Rust library for parsing Trionic-suite datalogger text files (`.t5l` / `.t7l`)
//! and converting them to normalized CSV with derived lambda channels.
//!
//! ## Features
//!
//! - **Tolerant ingestion**: best-effort, line-by-line salvage of semi-structured logs
//! - **Dynamic schema**: channels are interned as they appear; no format definition needed
//! - **Type inference**: every field is classified as text, integer or float by a
//!   permissive numeric scanner, with per-channel type widening across the whole log
//! - **Lambda derivation**: the device's incompatible air/fuel-ratio encodings
//!   (analog scanner counts, direct AFR, wideband) are unified into lambda columns
//! - **Deterministic output**: column order follows stable symbol ids, not map traversal
//!
//! ## Quick Start
//!
//! ```no_run
//! use trionic_parser::{CsvWriter, LogReader};
//!
//! // Read a Trionic log file
//! let reader = LogReader::from_file("session.t5l")?;
//! let log = reader.read_all();
//!
//! println!("Read {} records", log.record_count());
//!
//! // Write to CSV
//! CsvWriter::new("session.csv").write(&log)?;
//! # Ok::<(), trionic_parser::Error>(())
//! ```
//!
//! ## Input Format
//!
//! One record per line: a timestamp followed by pipe-delimited `name=value`
//! fields, where the set of fields may change from line to line:
//!
//! ```text
//! 07/05/2023 18:33:12.345|Rpm=2210|Tryck=1.52|AFR=13.1|
//! ```
//!
//! Three timestamp layouts are recognized (`/`, `-` or `.` as the date
//! separator); the layout of the first line is locked for the whole file.
//!
//! ## Output
//!
//! A CSV with a "Time" column (elapsed seconds since the first record) and
//! one column per channel that occurs in *every* record. Sporadic channels
//! are dropped entirely. The alternative lambda encodings all render under a
//! single "Lambda" header with their values converted per encoding.
//!
//! ## Advanced Usage
//!
//! ### Inspecting the ingested log
//!
//! ```no_run
//! use trionic_parser::LogReader;
//!
//! let reader = LogReader::from_file("session.t5l")?;
//! let (log, format) = reader.read_all_with_format();
//!
//! println!("Date format: {:?}", format);
//! println!("Found {} unique channels", log.symbols.len());
//! for (id, symbol) in log.symbols.iter() {
//!     println!("  #{} {} ({:?}, {} occurrences)", id, symbol.name, symbol.value_type, symbol.used);
//! }
//! # Ok::<(), trionic_parser::Error>(())
//! ```
//!
//! ### Low-Level Access
//!
//! For custom processing, drive the parser and projection directly:
//!
//! ```no_run
//! use trionic_parser::datalog::LogParser;
//! use trionic_parser::formatter::CsvFormatter;
//!
//! let mut parser = LogParser::new();
//! let log = parser.parse("07/05/2023 18:33:12.345|Rpm=2210|\n");
//!
//! let mut csv = Vec::new();
//! CsvFormatter::new(&log).write_csv(&mut csv)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Ingestion never fails: malformed lines are skipped, truncated fields are
//! dropped, and an unrecognized first line yields an empty log. Only the
//! file-handle boundary returns `Result<T, Error>`:
//!
//! ```no_run
//! use trionic_parser::{Error, LogReader};
//!
//! match LogReader::from_file("session.t5l") {
//!     Ok(reader) => {
//!         // Process the log...
//!     }
//!     Err(Error::Io(err)) => {
//!         eprintln!("I/O error: {}", err);
//!     }
//!     Err(err) => {
//!         eprintln!("Error: {}", err);
//!     }
//! }
//! ```

// Public API modules
pub mod error;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use reader::{LogReader, LogReaderBuilder};
pub use writer::{CsvWriter, WriteStats};

// Re-export models for users who need them
pub use datalog::DateFormat;
pub use models::{Log, Record, Symbol, SymbolId, SymbolTable, Timestamp, Value, ValueType};

// Internal modules (public but not part of the high-level API)
pub mod datalog;
pub mod formatter;
pub mod models;
