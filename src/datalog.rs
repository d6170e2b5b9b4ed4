use log::{debug, warn};

use crate::models::{Log, Record, Timestamp, Value};

/// Date separator layout of the timestamp portion. All three layouts use `:`
/// for the time fields and `.` before the milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `DD/MM/YYYY HH:MM:SS.mmm`
    Slash,
    /// `DD-MM-YYYY HH:MM:SS.mmm`
    Dash,
    /// `DD.MM.YYYY HH:MM:SS.mmm`
    Dot,
}

impl DateFormat {
    const CANDIDATES: [DateFormat; 3] = [DateFormat::Slash, DateFormat::Dash, DateFormat::Dot];

    pub fn date_separator(self) -> char {
        match self {
            DateFormat::Slash => '/',
            DateFormat::Dash => '-',
            DateFormat::Dot => '.',
        }
    }

    /// Try each candidate layout against `line`; the first one that extracts
    /// all 7 timestamp fields wins.
    pub fn detect(line: &str) -> Option<DateFormat> {
        Self::CANDIDATES
            .into_iter()
            .find(|&format| scan_timestamp(line, format).1 == 7)
    }
}

/// Scan up to 7 timestamp fields from the start of `line` using the given
/// layout. Returns the timestamp (unscanned fields stay zero) and how many
/// fields were extracted.
pub fn scan_timestamp(line: &str, format: DateFormat) -> (Timestamp, usize) {
    let sep = format.date_separator();
    // Literal separator expected after each of the first six fields; `None`
    // stands for a run of whitespace between date and time.
    let separators = [Some(sep), Some(sep), None, Some(':'), Some(':'), Some('.')];

    let mut fields = [0u32; 7];
    let mut matched = 0;
    let mut rest = line;

    for i in 0..7 {
        let Some((value, after)) = scan_u32(rest) else {
            break;
        };
        fields[i] = value;
        matched += 1;
        rest = after;

        if i == 6 {
            break;
        }
        match separators[i] {
            Some(c) => {
                if let Some(after) = rest.strip_prefix(c) {
                    rest = after;
                } else {
                    break;
                }
            }
            None => rest = rest.trim_start(),
        }
    }

    let [day, month, year, hour, minute, second, millisecond] = fields;
    (
        Timestamp::new(day, month, year, hour, minute, second, millisecond),
        matched,
    )
}

fn scan_u32(input: &str) -> Option<(u32, &str)> {
    let input = input.trim_start();
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    // Overflowing digit runs are clamped rather than rejected; the scan is
    // best-effort by design.
    let value = input[..end].parse().unwrap_or(u32::MAX);
    Some((value, &input[end..]))
}

/// Permissive numeric-literal scan, left to right: one `-` makes the result
/// negative, digits accumulate, the first `.` or `,` switches to fractional
/// mode. A second `-` or separator, or any other character, stops the scan.
/// Returns the accumulated value, whether fractional digits were consumed,
/// and the unconsumed suffix.
pub fn scan_number(token: &str) -> (f64, bool, &str) {
    let bytes = token.as_bytes();
    let mut value = 0.0_f64;
    let mut negative = false;
    let mut fractional = false;
    let mut frac_digits = 0i32;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'-' => {
                if negative {
                    break;
                }
                negative = true;
            }
            digit @ b'0'..=b'9' => {
                value = value * 10.0 + (digit - b'0') as f64;
                if fractional {
                    frac_digits += 1;
                }
            }
            b'.' | b',' => {
                if fractional {
                    break;
                }
                fractional = true;
            }
            _ => break,
        }
        pos += 1;
    }

    let mut is_float = false;
    if frac_digits > 0 {
        value /= 10f64.powi(frac_digits);
        is_float = true;
    }
    if negative {
        value = -value;
    }
    (value, is_float, &token[pos..])
}

/// Classify a field value. A token is numeric only if the scanner consumed it
/// entirely; partial numeric prefixes classify as text.
pub fn classify_value(token: &str) -> Value {
    let (number, is_float, rest) = scan_number(token);
    if !rest.is_empty() {
        Value::Text(token.to_string())
    } else if is_float {
        Value::Float(number)
    } else {
        Value::Integer(number as i64)
    }
}

/// Line-oriented log ingestion.
///
/// The date format is resolved once from the first line and locked for the
/// rest of the input; ingestion never fails, it skips what it cannot parse.
#[derive(Debug, Default)]
pub struct LogParser {
    date_format: Option<DateFormat>,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the date format up front instead of detecting it from the first line.
    pub fn with_format(format: DateFormat) -> Self {
        Self {
            date_format: Some(format),
        }
    }

    /// The locked date format, once ingestion has seen the first line.
    pub fn date_format(&self) -> Option<DateFormat> {
        self.date_format
    }

    /// Ingest log text into a [`Log`].
    ///
    /// If no candidate layout matches the first line the whole input is
    /// treated as unparseable and an empty log is returned. A line without a
    /// `|` delimiter ends ingestion (end of data). Empty records are
    /// discarded; a final field not closed by `|` is dropped.
    pub fn parse(&mut self, text: &str) -> Log {
        let mut log = Log::new();
        let mut discarded = 0usize;

        for line in text.lines() {
            let format = match self.date_format {
                Some(format) => format,
                None => match DateFormat::detect(line) {
                    Some(format) => {
                        debug!("date format locked to {:?}", format);
                        self.date_format = Some(format);
                        format
                    }
                    None => {
                        warn!("no date format matches the first line, nothing to ingest");
                        return log;
                    }
                },
            };

            // After the lock the scan is lenient: fields that fail to parse
            // stay zero and the record is kept.
            let (timestamp, _) = scan_timestamp(line, format);

            let Some(bar) = line.find('|') else {
                debug!("line without field delimiter, treating as end of data");
                break;
            };

            let mut record = Record::new(timestamp);
            let mut rest = &line[bar + 1..];
            let mut ordinal = 0usize;

            while let Some(eq) = rest.find('=') {
                let name = &rest[..eq];
                let after = &rest[eq + 1..];
                let Some(end) = after.find('|') else {
                    // Truncated final field, drop it and move on.
                    break;
                };

                let id = log.symbols.resolve(name, Some(ordinal));
                ordinal += 1;

                let value = classify_value(&after[..end]);
                let observed = value.value_type();
                record.insert(id, value);
                if let Some(symbol) = log.symbols.get_mut(id) {
                    symbol.used += 1;
                    symbol.widen(observed);
                }

                rest = &after[end + 1..];
            }

            if record.is_empty() {
                discarded += 1;
            } else {
                log.push(record);
            }
        }

        debug!(
            "ingested {} records, {} symbols ({} empty records discarded)",
            log.record_count(),
            log.symbols.len(),
            discarded
        );
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_number_integer() {
        assert_eq!(scan_number("850"), (850.0, false, ""));
        assert_eq!(scan_number("-7"), (-7.0, false, ""));
    }

    #[test]
    fn test_scan_number_fractional() {
        let (value, is_float, rest) = scan_number("12.5");
        assert_eq!((value, is_float, rest), (12.5, true, ""));
        let (value, is_float, rest) = scan_number("3,14");
        assert_eq!((value, is_float, rest), (3.14, true, ""));
    }

    #[test]
    fn test_scan_number_unconsumed_suffix() {
        assert_eq!(scan_number("12a"), (12.0, false, "a"));
        assert_eq!(scan_number("--5"), (0.0, false, "-5"));
        assert_eq!(scan_number("1.2.3"), (1.2, true, ".3"));
    }

    #[test]
    fn test_trailing_separator_is_not_fractional() {
        // "5." consumes fully but never sees a fractional digit.
        assert_eq!(scan_number("5."), (5.0, false, ""));
    }

    #[test]
    fn test_detect_all_layouts() {
        assert_eq!(
            DateFormat::detect("07/05/2023 18:33:12.345|Rpm=850|"),
            Some(DateFormat::Slash)
        );
        assert_eq!(
            DateFormat::detect("07-05-2023 18:33:12.345|Rpm=850|"),
            Some(DateFormat::Dash)
        );
        assert_eq!(
            DateFormat::detect("07.05.2023 18:33:12.345|Rpm=850|"),
            Some(DateFormat::Dot)
        );
        assert_eq!(DateFormat::detect("Rpm=850|"), None);
    }

    #[test]
    fn test_scan_timestamp_full_match() {
        let (ts, matched) = scan_timestamp("07/05/2023 18:33:12.345|x=1|", DateFormat::Slash);
        assert_eq!(matched, 7);
        assert_eq!(ts, Timestamp::new(7, 5, 2023, 18, 33, 12, 345));
    }

    #[test]
    fn test_scan_timestamp_partial_match_keeps_zeros() {
        let (ts, matched) = scan_timestamp("07.05.2023 18:33:12.345|x=1|", DateFormat::Slash);
        assert_eq!(matched, 1);
        assert_eq!(ts.day, 7);
        assert_eq!(ts.hour, 0);
    }
}
