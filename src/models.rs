use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io;

/// 1-based symbol id. Ids are assigned sequentially on first sighting during
/// ingestion and stay stable for the lifetime of a [`Log`]; 0 is never valid.
pub type SymbolId = u32;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_DAY: i64 = 86_400_000;

/// A fixed-precision date/time value as reported by the logging device.
///
/// No calendar validation is performed; the fields are a pass-through of
/// whatever the device wrote. Ordering within one log comes from [`Timestamp::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub day: u32,
    pub month: u32,
    pub year: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl Timestamp {
    pub fn new(
        day: u32,
        month: u32,
        year: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Self {
        Self {
            day,
            month,
            year,
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Millisecond-resolution ordering key. Month and year are not part of the
    /// weighting; day granularity is enough for single-session logs.
    pub fn tick(&self) -> i64 {
        self.millisecond as i64
            + self.second as i64 * MS_PER_SECOND
            + self.minute as i64 * MS_PER_MINUTE
            + self.hour as i64 * MS_PER_HOUR
            + self.day as i64 * MS_PER_DAY
    }

    /// Inverse of [`Timestamp::tick`]. Month and year are not representable in
    /// a tick and decode as zero.
    pub fn from_tick(tick: i64) -> Self {
        let day = tick / MS_PER_DAY;
        let mut rest = tick % MS_PER_DAY;
        let hour = rest / MS_PER_HOUR;
        rest %= MS_PER_HOUR;
        let minute = rest / MS_PER_MINUTE;
        rest %= MS_PER_MINUTE;
        let second = rest / MS_PER_SECOND;
        let millisecond = rest % MS_PER_SECOND;
        Self {
            day: day as u32,
            month: 0,
            year: 0,
            hour: hour as u32,
            minute: minute as u32,
            second: second as u32,
            millisecond: millisecond as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02}.{:04} {:02}:{:02}:{:02}.{:03}",
            self.day, self.month, self.year, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Inferred channel type, ordered by width: once a channel has ever been seen
/// as Text it stays Text; a Float sighting is never narrowed back to Integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ValueType {
    Integer,
    Float,
    Text,
}

/// A tagged scalar produced by the numeric-literal scanner in [`crate::datalog`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
        }
    }

    /// Numeric view of the value; `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Text(_) => None,
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Per-channel metadata tracked while ingesting.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    /// Channel name as it appears in the log.
    pub name: String,
    /// Widest type observed across all records.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Number of field occurrences of this channel.
    pub used: usize,
}

impl Symbol {
    pub fn widen(&mut self, observed: ValueType) {
        if observed > self.value_type {
            self.value_type = observed;
        }
    }
}

/// Bijective channel-name-to-id interning table with per-id metadata.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a channel name to its id, creating a new symbol on first
    /// sighting. `hint` is the 0-based ordinal of the field within its line;
    /// when it indexes an existing symbol with a matching name the lookup
    /// short-circuits, since most records repeat the previous field order.
    pub fn resolve(&mut self, name: &str, hint: Option<usize>) -> SymbolId {
        if let Some(hint) = hint {
            if let Some(symbol) = self.symbols.get(hint) {
                if symbol.name == name {
                    return (hint + 1) as SymbolId;
                }
            }
        }

        if let Some(&id) = self.index.get(name) {
            return id;
        }

        let id = (self.symbols.len() + 1) as SymbolId;
        self.index.insert(name.to_string(), id);
        self.symbols.push(Symbol {
            name: name.to_string(),
            value_type: ValueType::Integer,
            used: 0,
        });
        id
    }

    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get((id as usize).checked_sub(1)?)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut((id as usize).checked_sub(1)?)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| ((i + 1) as SymbolId, s))
    }
}

/// One timestamped observation: a set of (symbol id, value) entries, unique
/// per id and ordered by ascending id.
#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: Timestamp,
    entries: Vec<(SymbolId, Value)>,
}

impl Record {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            entries: Vec::new(),
        }
    }

    /// Insert a value for a symbol. The first value for an id wins; a
    /// duplicate insert is a no-op and returns `false`.
    pub fn insert(&mut self, id: SymbolId, value: Value) -> bool {
        match self.entries.binary_search_by_key(&id, |&(id, _)| id) {
            Ok(_) => false,
            Err(pos) => {
                self.entries.insert(pos, (id, value));
                true
            }
        }
    }

    /// Replace the value for a symbol, inserting if absent. Returns `true`
    /// when a new entry was created.
    pub fn set(&mut self, id: SymbolId, value: Value) -> bool {
        match self.entries.binary_search_by_key(&id, |&(id, _)| id) {
            Ok(pos) => {
                self.entries[pos].1 = value;
                false
            }
            Err(pos) => {
                self.entries.insert(pos, (id, value));
                true
            }
        }
    }

    pub fn get(&self, id: SymbolId) -> Option<&Value> {
        self.entries
            .binary_search_by_key(&id, |&(id, _)| id)
            .ok()
            .map(|pos| &self.entries[pos].1)
    }

    /// Entries in ascending symbol-id order.
    pub fn entries(&self) -> &[(SymbolId, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The aggregate: a symbol table plus the record sequence in file order.
///
/// Built once by ingestion (see [`crate::datalog::LogParser`]), then read by
/// the CSV emission pass.
#[derive(Debug, Default)]
pub struct Log {
    pub symbols: SymbolTable,
    records: Vec<Record>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A symbol is valid for CSV output iff it occurs in every record.
    pub fn symbol_valid(&self, id: SymbolId) -> bool {
        self.symbols
            .get(id)
            .map(|s| s.used == self.records.len())
            .unwrap_or(false)
    }

    /// Look up a channel value by name on the record at `line`.
    pub fn value(&self, line: usize, name: &str) -> Option<&Value> {
        let id = self.symbols.id_of(name)?;
        self.records.get(line)?.get(id)
    }

    /// Integer view of a channel value; `default` when the channel is absent
    /// from the record or its text does not parse.
    pub fn int_value(&self, line: usize, name: &str, default: i64) -> i64 {
        match self.value(line, name) {
            Some(Value::Integer(v)) => *v,
            Some(Value::Float(v)) => *v as i64,
            Some(Value::Text(s)) => s.trim().parse().unwrap_or(default),
            None => default,
        }
    }

    /// Float view of a channel value; `default` when the channel is absent
    /// from the record or its text does not parse.
    pub fn float_value(&self, line: usize, name: &str, default: f64) -> f64 {
        match self.value(line, name) {
            Some(Value::Float(v)) => *v,
            Some(Value::Integer(v)) => *v as f64,
            Some(Value::Text(s)) => s.trim().parse().unwrap_or(default),
            None => default,
        }
    }

    /// Replace or insert a channel value on the record at `line`, classifying
    /// `raw` with the numeric-literal scanner and widening the symbol type as
    /// ingestion would. No-op when `line` is out of range.
    pub fn set_value(&mut self, line: usize, name: &str, raw: &str) {
        if line >= self.records.len() {
            return;
        }
        let id = self.symbols.resolve(name, None);
        let value = crate::datalog::classify_value(raw);
        let observed = value.value_type();
        let inserted = self.records[line].set(id, value);
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.widen(observed);
            if inserted {
                symbol.used += 1;
            }
        }
    }

    pub fn set_int_value(&mut self, line: usize, name: &str, value: i64) {
        self.set_value(line, name, &value.to_string());
    }

    /// Serialize back to the native pipe-delimited text form, one line per
    /// record. Every field is closed with a `|` so the output re-ingests
    /// losslessly.
    pub fn write_log<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for record in &self.records {
            write!(out, "{}|", record.timestamp)?;
            for (id, value) in record.entries() {
                let name = self.symbols.get(*id).map(|s| s.name.as_str()).unwrap_or("");
                write!(out, "{}={}|", name, value)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
