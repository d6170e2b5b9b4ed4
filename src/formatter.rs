use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::models::{Log, Record, SymbolId, Value};

/// Stoichiometric air/fuel ratio for the fuel assumed by the logging device.
pub const STOICH_RATIO: f64 = 14.64;

/// Channel name of the 0-1023 counts analog lambda scanner.
const AD_SCANNER_NAME: &str = "DisplProt.AD_Scanner";

const AD_FULL_SCALE: f64 = 1023.0;
const AD_AFR_MIN: f64 = 7.35;
const AD_AFR_MAX: f64 = 21.0;
/// Readings below this many counts mean the scanner is not connected.
const AD_DISCONNECT_COUNTS: f64 = 10.0;

/// Wideband readings above this are an out-of-range/disconnected sensor
/// state; the whole record is dropped.
const WIDEBAND_SKIP_ABOVE: f64 = 20.0;
const WIDEBAND_AFR_MIN: f64 = 5.0;
const WIDEBAND_AFR_MAX: f64 = 20.0;

/// How a channel's values are rewritten during CSV emission. Resolved once
/// per symbol from its name at column-selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaKind {
    /// 0-1023 counts reading, rescaled linearly to an AFR first.
    AnalogScanner,
    /// Raw value is already an AFR.
    AfrDirect,
    /// Mixed encoding: AFR window, lambda window, and a record-skip threshold.
    Wideband,
    /// Not a lambda channel; values are emitted as stored.
    Passthrough,
}

impl LambdaKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            AD_SCANNER_NAME => LambdaKind::AnalogScanner,
            "AFR" | "AD_EGR" => LambdaKind::AfrDirect,
            "Wideband" => LambdaKind::Wideband,
            _ => LambdaKind::Passthrough,
        }
    }

    pub fn is_lambda(self) -> bool {
        !matches!(self, LambdaKind::Passthrough)
    }
}

/// CSV column header for a stored channel name. The alternative lambda
/// encodings all render as "Lambda", and the device's trailing `!` marker is
/// stripped.
pub fn display_name(name: &str) -> &str {
    if LambdaKind::from_name(name).is_lambda() {
        return "Lambda";
    }
    name.strip_suffix('!').unwrap_or(name)
}

/// Map an analog-scanner counts reading onto the scanner's AFR range and
/// normalize to lambda.
pub fn ad_scanner_to_lambda(raw: f64) -> f64 {
    let v = raw / AD_FULL_SCALE;
    let steepness = AD_AFR_MAX - AD_AFR_MIN;
    let afr = v * steepness + AD_AFR_MIN;
    afr / STOICH_RATIO
}

struct Column {
    id: SymbolId,
    kind: LambdaKind,
}

/// CSV projection over a fully ingested [`Log`].
///
/// Column selection happens once at construction: a symbol becomes a column
/// iff it occurs in every record. Sporadic channels are dropped entirely,
/// not emitted as blank cells.
pub struct CsvFormatter<'a> {
    log: &'a Log,
    columns: Vec<Column>,
}

impl<'a> CsvFormatter<'a> {
    pub fn new(log: &'a Log) -> Self {
        let columns = log
            .symbols
            .iter()
            .filter(|&(id, _)| log.symbol_valid(id))
            .map(|(id, symbol)| Column {
                id,
                kind: LambdaKind::from_name(&symbol.name),
            })
            .collect();
        Self { log, columns }
    }

    /// Number of channel columns that survived selection (excluding "Time").
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Header names in emission order, excluding "Time".
    pub fn column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|col| self.log.symbols.get(col.id))
            .map(|symbol| display_name(&symbol.name))
            .collect()
    }

    /// Emit the CSV text. Returns the number of record rows written;
    /// records dropped by the Wideband skip rule are not written.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<usize> {
        self.write_header(out)?;

        let Some(first) = self.log.records().first() else {
            return Ok(0);
        };
        let start = first.timestamp.tick();

        let mut written = 0usize;
        for record in self.log.records() {
            if self.should_skip(record) {
                continue;
            }

            let elapsed = (record.timestamp.tick() - start) as f64 / 1000.0;
            write!(out, "{}", elapsed)?;
            for col in &self.columns {
                write!(out, ",")?;
                if let Some(value) = record.get(col.id) {
                    write_value(out, col.kind, value)?;
                }
            }
            writeln!(out)?;
            written += 1;
        }

        debug!(
            "wrote {} of {} records across {} columns",
            written,
            self.log.record_count(),
            self.columns.len()
        );
        Ok(written)
    }

    fn write_header<W: Write>(&self, out: &mut W) -> Result<()> {
        write!(out, "Time")?;
        for name in self.column_names() {
            write!(out, ",{}", name)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// A record is dropped entirely when any of its output-valid entries is a
    /// Wideband reading above the disconnect threshold.
    fn should_skip(&self, record: &Record) -> bool {
        self.columns.iter().any(|col| {
            col.kind == LambdaKind::Wideband
                && record
                    .get(col.id)
                    .and_then(Value::as_f64)
                    .is_some_and(|raw| raw > WIDEBAND_SKIP_ABOVE)
        })
    }
}

fn write_value<W: Write>(out: &mut W, kind: LambdaKind, value: &Value) -> std::io::Result<()> {
    // Text stays verbatim whatever the channel; only numeric readings are
    // rewritten.
    let Some(raw) = value.as_f64() else {
        return write!(out, "{}", value);
    };

    match kind {
        LambdaKind::AnalogScanner => {
            let lambda = if raw < AD_DISCONNECT_COUNTS {
                // Unconnected scanner, force lambda to zero.
                0.0
            } else {
                ad_scanner_to_lambda(raw)
            };
            write!(out, "{}", lambda)
        }
        LambdaKind::AfrDirect => write!(out, "{}", raw / STOICH_RATIO),
        LambdaKind::Wideband => {
            if raw > WIDEBAND_AFR_MIN && raw < WIDEBAND_AFR_MAX {
                write!(out, "{}", raw / STOICH_RATIO)
            } else {
                // Readings in (0.1, 2) are already lambda and pass through
                // as stored; so do values outside every window, including
                // the (2, 5] gap, which the device firmware never converted.
                write!(out, "{}", value)
            }
        }
        LambdaKind::Passthrough => write!(out, "{}", value),
    }
}
