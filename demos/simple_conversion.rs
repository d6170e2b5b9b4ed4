//! Simple example of converting a Trionic log file to CSV.

use trionic_parser::{CsvWriter, LogReader};

fn main() -> Result<(), trionic_parser::Error> {
    // Read the log file
    let reader = LogReader::from_file("session.t5l")?;

    // Ingest all records
    let log = reader.read_all();

    println!("Read {} records", log.record_count());

    // Write to CSV
    CsvWriter::new("session.csv").write(&log)?;

    println!("Wrote session.csv");

    Ok(())
}
