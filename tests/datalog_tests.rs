mod common;

use common::LogBuilder;
use trionic_parser::datalog::{classify_value, DateFormat, LogParser};
use trionic_parser::models::{SymbolTable, Value, ValueType};
use trionic_parser::{LogReader, Timestamp};

fn parse(text: String) -> trionic_parser::Log {
    LogReader::from_string(text).read_all()
}

// ============================================================================
// FORMAT DETECTION TESTS
// ============================================================================

#[test]
fn test_detects_slash_layout() {
    let text = LogBuilder::with_separator('/')
        .record(0, &[("Rpm", "850")])
        .build();
    let (log, format) = LogReader::from_string(text).read_all_with_format();
    assert_eq!(format, Some(DateFormat::Slash));
    assert_eq!(log.record_count(), 1);
}

#[test]
fn test_detects_dash_layout() {
    let text = LogBuilder::with_separator('-')
        .record(0, &[("Rpm", "850")])
        .build();
    let (log, format) = LogReader::from_string(text).read_all_with_format();
    assert_eq!(format, Some(DateFormat::Dash));
    assert_eq!(log.record_count(), 1);
}

#[test]
fn test_detects_dot_layout() {
    let text = LogBuilder::with_separator('.')
        .record(0, &[("Rpm", "850")])
        .build();
    let (log, format) = LogReader::from_string(text).read_all_with_format();
    assert_eq!(format, Some(DateFormat::Dot));
    assert_eq!(log.record_count(), 1);
}

#[test]
fn test_unrecognized_first_line_yields_empty_log() {
    // Even though later lines are well-formed, detection is one-shot on the
    // first line.
    let good = LogBuilder::new().record(0, &[("Rpm", "850")]).build();
    let text = format!("garbage without a timestamp\n{}", good);
    let (log, format) = LogReader::from_string(text).read_all_with_format();
    assert!(log.is_empty());
    assert_eq!(format, None);
}

#[test]
fn test_format_is_locked_after_first_line() {
    // The second line uses a different separator; its timestamp scan stops
    // after the day field but the record is still ingested.
    let first = LogBuilder::with_separator('/')
        .record(0, &[("Rpm", "850")])
        .build();
    let second = LogBuilder::with_separator('.')
        .record(2000, &[("Rpm", "900")])
        .build();
    let log = parse(format!("{}{}", first, second));

    assert_eq!(log.record_count(), 2);
    let ts = log.records()[1].timestamp;
    assert_eq!(ts.day, 1);
    assert_eq!(ts.hour, 0);
}

#[test]
fn test_forced_format_skips_detection() {
    let text = LogBuilder::with_separator('.')
        .record(0, &[("Rpm", "850")])
        .build();
    let reader = trionic_parser::LogReaderBuilder::new()
        .date_format(DateFormat::Dot)
        .from_string(text);
    let (log, format) = reader.read_all_with_format();
    assert_eq!(format, Some(DateFormat::Dot));
    assert_eq!(log.record_count(), 1);
}

#[test]
fn test_timestamp_fields_extracted() {
    let log = parse("07/05/2023 18:33:12.345|Rpm=850|\n".to_string());
    assert_eq!(log.record_count(), 1);
    assert_eq!(
        log.records()[0].timestamp,
        Timestamp::new(7, 5, 2023, 18, 33, 12, 345)
    );
}

// ============================================================================
// VALUE CLASSIFICATION TESTS
// ============================================================================

#[test]
fn test_classify_float() {
    assert_eq!(classify_value("12.5"), Value::Float(12.5));
}

#[test]
fn test_classify_negative_integer() {
    assert_eq!(classify_value("-7"), Value::Integer(-7));
}

#[test]
fn test_classify_comma_decimal_separator() {
    assert_eq!(classify_value("3,14"), Value::Float(3.14));
}

#[test]
fn test_classify_partial_numeric_prefix_is_text() {
    assert_eq!(classify_value("12a"), Value::Text("12a".to_string()));
}

#[test]
fn test_classify_double_minus_is_text() {
    assert_eq!(classify_value("--5"), Value::Text("--5".to_string()));
}

#[test]
fn test_classify_second_separator_is_text() {
    // Thousands separators never survive: the second digit-group separator
    // aborts the scan.
    assert_eq!(classify_value("1.234,5"), Value::Text("1.234,5".to_string()));
}

#[test]
fn test_classified_values_land_in_records() {
    let text = LogBuilder::new()
        .record(0, &[("Rpm", "850"), ("Tryck", "1.52"), ("Mode", "ON")])
        .build();
    let log = parse(text);
    assert_eq!(log.value(0, "Rpm"), Some(&Value::Integer(850)));
    assert_eq!(log.value(0, "Tryck"), Some(&Value::Float(1.52)));
    assert_eq!(log.value(0, "Mode"), Some(&Value::Text("ON".to_string())));
}

// ============================================================================
// SYMBOL TABLE TESTS
// ============================================================================

#[test]
fn test_symbol_ids_are_sequential_and_stable() {
    let text = LogBuilder::new()
        .record(0, &[("Rpm", "850"), ("Tryck", "1.52")])
        .record(100, &[("Tryck", "1.60"), ("Rpm", "900")])
        .build();
    let log = parse(text);

    assert_eq!(log.symbols.id_of("Rpm"), Some(1));
    assert_eq!(log.symbols.id_of("Tryck"), Some(2));
    assert_eq!(log.symbols.len(), 2);
}

#[test]
fn test_resolve_hint_mismatch_still_finds_symbol() {
    let mut table = SymbolTable::new();
    let rpm = table.resolve("Rpm", Some(0));
    let tryck = table.resolve("Tryck", Some(1));

    // Hints pointing at the wrong slot fall back to the name lookup.
    assert_eq!(table.resolve("Rpm", Some(1)), rpm);
    assert_eq!(table.resolve("Tryck", Some(0)), tryck);
    // A matching hint short-circuits to the same id.
    assert_eq!(table.resolve("Rpm", Some(0)), rpm);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_type_widens_to_float() {
    let text = LogBuilder::new()
        .record(0, &[("Load", "3")])
        .record(100, &[("Load", "3.5")])
        .build();
    let log = parse(text);
    let symbol = log.symbols.get(log.symbols.id_of("Load").unwrap()).unwrap();
    assert_eq!(symbol.value_type, ValueType::Float);
}

#[test]
fn test_type_widens_to_text_and_stays() {
    let text = LogBuilder::new()
        .record(0, &[("Load", "3")])
        .record(100, &[("Load", "3.5")])
        .record(200, &[("Load", "x")])
        .record(300, &[("Load", "4")])
        .build();
    let log = parse(text);
    let symbol = log.symbols.get(log.symbols.id_of("Load").unwrap()).unwrap();
    assert_eq!(symbol.value_type, ValueType::Text);
}

#[test]
fn test_widening_is_order_independent() {
    let forward = parse(
        LogBuilder::new()
            .record(0, &[("Load", "3")])
            .record(100, &[("Load", "3.5")])
            .build(),
    );
    let backward = parse(
        LogBuilder::new()
            .record(0, &[("Load", "3.5")])
            .record(100, &[("Load", "3")])
            .build(),
    );
    let a = forward.symbols.get(1).unwrap().value_type;
    let b = backward.symbols.get(1).unwrap().value_type;
    assert_eq!(a, ValueType::Float);
    assert_eq!(a, b);
}

#[test]
fn test_usage_counters_track_occurrences() {
    let text = LogBuilder::new()
        .record(0, &[("Rpm", "850"), ("Gear", "1")])
        .record(100, &[("Rpm", "900")])
        .record(200, &[("Rpm", "950"), ("Gear", "2")])
        .build();
    let log = parse(text);

    assert_eq!(log.symbols.get(log.symbols.id_of("Rpm").unwrap()).unwrap().used, 3);
    assert_eq!(log.symbols.get(log.symbols.id_of("Gear").unwrap()).unwrap().used, 2);
    assert!(log.symbol_valid(log.symbols.id_of("Rpm").unwrap()));
    assert!(!log.symbol_valid(log.symbols.id_of("Gear").unwrap()));
}

// ============================================================================
// RECORD STRUCTURE TESTS
// ============================================================================

#[test]
fn test_entries_iterate_in_ascending_id_order() {
    let text = LogBuilder::new()
        .record(0, &[("A", "1"), ("B", "2"), ("C", "3")])
        .record(100, &[("C", "6"), ("A", "4"), ("B", "5")])
        .build();
    let log = parse(text);

    for record in log.records() {
        let ids: Vec<_> = record.entries().iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
    assert_eq!(log.value(1, "A"), Some(&Value::Integer(4)));
    assert_eq!(log.value(1, "C"), Some(&Value::Integer(6)));
}

#[test]
fn test_duplicate_field_keeps_first_value() {
    let log = parse("01/01/2023 10:00:00.000|Rpm=850|Rpm=900|\n".to_string());
    assert_eq!(log.value(0, "Rpm"), Some(&Value::Integer(850)));
    // Both occurrences count toward usage, so the channel overshoots the
    // record count and is no longer valid for output.
    assert_eq!(log.symbols.get(1).unwrap().used, 2);
    assert!(!log.symbol_valid(1));
}

// ============================================================================
// MALFORMED INPUT TESTS
// ============================================================================

#[test]
fn test_line_without_delimiter_ends_ingestion() {
    let text = format!(
        "{}no pipe on this line\n{}",
        LogBuilder::new().record(0, &[("Rpm", "850")]).build(),
        LogBuilder::new().record(200, &[("Rpm", "950")]).build()
    );
    let log = parse(text);
    assert_eq!(log.record_count(), 1);
}

#[test]
fn test_truncated_final_field_is_dropped() {
    // "Tryck=1.5" has no closing pipe and never becomes an entry.
    let log = parse("01/01/2023 10:00:00.000|Rpm=850|Tryck=1.5\n".to_string());
    assert_eq!(log.record_count(), 1);
    assert_eq!(log.records()[0].len(), 1);
    assert_eq!(log.value(0, "Rpm"), Some(&Value::Integer(850)));
    assert_eq!(log.symbols.id_of("Tryck"), None);
}

#[test]
fn test_record_with_no_fields_is_discarded() {
    let text = format!(
        "{}01/01/2023 10:00:01.000|\n{}",
        LogBuilder::new().record(0, &[("Rpm", "850")]).build(),
        LogBuilder::new().record(2000, &[("Rpm", "950")]).build()
    );
    let log = parse(text);
    assert_eq!(log.record_count(), 2);
}

#[test]
fn test_empty_input() {
    let log = parse(String::new());
    assert!(log.is_empty());
    assert!(log.symbols.is_empty());
}

// ============================================================================
// DETERMINISM TESTS
// ============================================================================

#[test]
fn test_reingestion_is_structurally_identical() {
    let text = LogBuilder::new()
        .record(0, &[("Rpm", "850"), ("Tryck", "1.52"), ("Mode", "ON")])
        .record(100, &[("Rpm", "900"), ("Tryck", "1.48"), ("Mode", "ON")])
        .record(200, &[("Mode", "OFF"), ("Rpm", "950"), ("Tryck", "1.61")])
        .build();

    let mut first = LogParser::new();
    let a = first.parse(&text);
    let mut second = LogParser::new();
    let b = second.parse(&text);

    assert_eq!(a.record_count(), b.record_count());
    assert_eq!(a.symbols.len(), b.symbols.len());
    for (id, symbol) in a.symbols.iter() {
        let other = b.symbols.get(id).unwrap();
        assert_eq!(symbol.name, other.name);
        assert_eq!(symbol.value_type, other.value_type);
        assert_eq!(symbol.used, other.used);
    }
    for (x, y) in a.records().iter().zip(b.records()) {
        assert_eq!(x.timestamp, y.timestamp);
        assert_eq!(x.entries(), y.entries());
    }
}
