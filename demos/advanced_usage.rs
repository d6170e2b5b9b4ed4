//! Advanced example showing channel metadata access and emission stats.

use trionic_parser::{CsvWriter, LogReader};

fn main() -> Result<(), trionic_parser::Error> {
    // Read with the detected date format
    let reader = LogReader::from_file("session.t5l")?;
    let (log, format) = reader.read_all_with_format();

    println!("═══════════════════════════════════════");
    println!("Trionic Log Analysis");
    println!("═══════════════════════════════════════");
    println!();

    println!("📊 Statistics:");
    println!("  Total records: {}", log.record_count());
    println!("  Unique channels: {}", log.symbols.len());
    println!("  Date format: {:?}", format);
    println!();

    println!("📝 Channels:");
    for (id, symbol) in log.symbols.iter() {
        println!(
            "  #{} {} ({:?}, {} occurrence(s){})",
            id,
            symbol.name,
            symbol.value_type,
            symbol.used,
            if log.symbol_valid(id) { "" } else { ", sporadic" }
        );
    }
    println!();

    println!("📈 First 5 Records:");
    if let Some(first) = log.records().first() {
        let start = first.timestamp.tick();
        for (i, record) in log.records().iter().take(5).enumerate() {
            println!(
                "  {}: t={:.3}s, {} fields, {}",
                i + 1,
                (record.timestamp.tick() - start) as f64 / 1000.0,
                record.len(),
                record.timestamp
            );
        }
    }
    println!();

    let stats = CsvWriter::new("session.csv").write_with_stats(&log)?;
    println!("{}", stats.summary());

    Ok(())
}
