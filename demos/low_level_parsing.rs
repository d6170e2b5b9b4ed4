//! Low-level example driving the parser and CSV projection directly.

use trionic_parser::datalog::{classify_value, LogParser};
use trionic_parser::formatter::CsvFormatter;

fn main() -> anyhow::Result<()> {
    let text = "\
07/05/2023 18:33:12.345|Rpm=2210|Tryck=1.52|AFR=13.1|
07/05/2023 18:33:12.445|Rpm=2245|Tryck=1.55|AFR=13.3|
07/05/2023 18:33:12.545|Rpm=2302|Tryck=1.49|AFR=12.9|
";

    // The scanner that decides every field's type
    for token in ["2210", "1.52", "3,14", "12a", "--5"] {
        println!("{:8} -> {:?}", token, classify_value(token));
    }
    println!();

    // Drive ingestion directly
    let mut parser = LogParser::new();
    let log = parser.parse(text);
    println!(
        "Ingested {} records ({:?} layout)",
        log.record_count(),
        parser.date_format()
    );

    for record in log.records() {
        for (id, value) in record.entries() {
            let name = &log.symbols.get(*id).unwrap().name;
            print!("{}={:?} ", name, value);
        }
        println!();
    }
    println!();

    // Project to CSV in memory
    let mut csv = Vec::new();
    CsvFormatter::new(&log).write_csv(&mut csv)?;
    print!("{}", String::from_utf8(csv)?);

    Ok(())
}
