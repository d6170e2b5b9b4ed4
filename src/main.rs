//! Command-line interface for the Trionic log parser.
//!
//! This binary provides a simple CLI for converting .t5l/.t7l log files to CSV.

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use trionic_parser::{CsvWriter, LogReader};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert Trionic datalogger files (.t5l/.t7l) to CSV",
    long_about = "A tolerant parser for Trionic-suite datalogger text files with output to CSV.\n\n\
                  Channels present in every record become columns; the device's lambda/AFR\n\
                  encodings are unified and converted during emission."
)]
struct Args {
    /// A .t5l/.t7l log file, or a directory containing such files
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output CSV file (single-file mode; defaults to the input with a .csv extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<String>,

    /// Print the ingested channel metadata as JSON instead of converting
    #[arg(long)]
    channels: bool,
}

fn convert_one_file(input_file: &Path, output_file: &Path) -> Result<()> {
    info!("📄 Processing: {}", input_file.display());

    let start_time = Instant::now();

    let reader = LogReader::from_file(input_file)?;

    let t0 = Instant::now();
    let (log, format) = reader.read_all_with_format();
    info!(
        "   ├─ Read {} records in {:.2?}",
        log.record_count(),
        t0.elapsed()
    );

    if log.is_empty() {
        info!("   └─ No records recognized, nothing emitted\n");
        return Ok(());
    }

    if let Some(format) = format {
        info!("   ├─ Date format: {:?}", format);
    }
    info!("   ├─ Found {} unique channels", log.symbols.len());

    // Write to CSV
    let t1 = Instant::now();
    let stats = CsvWriter::new(output_file).write_with_stats(&log)?;

    info!("   ├─ Wrote CSV in {:.2?}", t1.elapsed());
    info!("   ├─ {}", stats.summary());
    info!("   └─ ✓ Total time: {:.2?}\n", start_time.elapsed());

    Ok(())
}

fn dump_channels(input_file: &Path) -> Result<()> {
    let reader = LogReader::from_file(input_file)?;
    let log = reader.read_all();

    let channels: Vec<_> = log.symbols.iter().map(|(_, symbol)| symbol).collect();
    println!("{}", serde_json::to_string_pretty(&channels)?);

    Ok(())
}

fn is_log_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("t5l") | Some("t7l")
    )
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let in_path = Path::new(&args.input);

    if args.channels {
        if !in_path.is_file() {
            anyhow::bail!("'{}' is not a valid log file", args.input);
        }
        return dump_channels(in_path);
    }

    // Single-file mode
    if in_path.is_file() {
        let output = args
            .output
            .map(PathBuf::from)
            .unwrap_or_else(|| in_path.with_extension("csv"));
        return convert_one_file(in_path, &output);
    }

    if !in_path.is_dir() {
        anyhow::bail!("'{}' is not a valid file or directory", args.input);
    }
    if args.output.is_some() {
        anyhow::bail!("--output only applies when INPUT is a single file");
    }

    // Find all .t5l/.t7l files
    let log_files: Vec<_> = fs::read_dir(in_path)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_log_file(&entry.path()))
        .collect();

    if log_files.is_empty() {
        info!("No .t5l/.t7l files found in {}", args.input);
        return Ok(());
    }

    info!("");
    info!("╔════════════════════════════════════════════╗");
    info!("║        Trionic Log → CSV Converter         ║");
    info!("╚════════════════════════════════════════════╝");
    info!("");
    info!(
        "📂 Found {} log file(s) in {}",
        log_files.len(),
        args.input
    );
    info!("");

    let total_start = Instant::now();

    // Process each file
    for (idx, entry) in log_files.iter().enumerate() {
        let input_file = entry.path();
        let output_file = input_file.with_extension("csv");

        info!("[{}/{}]", idx + 1, log_files.len());

        // Convert the file
        if let Err(e) = convert_one_file(&input_file, &output_file) {
            log::error!("   └─ ✗ Error: {}", e);
            log::error!("");
            continue;
        }
    }

    info!("═══════════════════════════════════════════");
    info!("🏁 All files processed in {:.2?}", total_start.elapsed());
    info!("");

    Ok(())
}
