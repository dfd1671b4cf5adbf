// 🏗️ Parser Framework
// One adapter per institution, all producing CanonicalRecord

use crate::encoding::SourceEncoding;
use crate::error::{ConvertError, Result};
use crate::record::CanonicalRecord;
use crate::sources::{
    AirwallexAdapter, CurrenxieAdapter, ErsteBankAdapter, NeatAdapter, PayoneerAdapter,
    RevolutAdapter, StarlingAdapter, WiseAdapter,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceType - which institution produced the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Airwallex,
    Currenxie,
    ErsteBank,
    Neat,
    Payoneer,
    Revolut,
    Starling,
    Wise,
}

impl SourceType {
    pub const ALL: [SourceType; 8] = [
        SourceType::Airwallex,
        SourceType::Currenxie,
        SourceType::ErsteBank,
        SourceType::Neat,
        SourceType::Payoneer,
        SourceType::Revolut,
        SourceType::Starling,
        SourceType::Wise,
    ];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceType::Airwallex => "Airwallex",
            SourceType::Currenxie => "Currenxie",
            SourceType::ErsteBank => "Erste Bank",
            SourceType::Neat => "Neat",
            SourceType::Payoneer => "Payoneer",
            SourceType::Revolut => "Revolut",
            SourceType::Starling => "Starling",
            SourceType::Wise => "Wise",
        }
    }

    /// Label used on the command line and in output file names
    pub fn code(&self) -> &'static str {
        match self {
            SourceType::Airwallex => "AIRWALLEX",
            SourceType::Currenxie => "CURRENXIE",
            SourceType::ErsteBank => "ERSTEBANK",
            SourceType::Neat => "NEAT",
            SourceType::Payoneer => "PAYONEER",
            SourceType::Revolut => "REVOLUT",
            SourceType::Starling => "STARLING",
            SourceType::Wise => "WISE",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SourceType {
    type Err = ConvertError;

    /// Case-insensitive match on the code (`revolut`, `ErsteBank`, ...)
    fn from_str(s: &str) -> Result<Self> {
        SourceType::ALL
            .into_iter()
            .find(|source| source.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = SourceType::ALL.iter().map(|t| t.code()).collect();
                ConvertError::configuration(format!(
                    "unknown source '{}' (expected one of {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// How an export has to be read before it is a plain table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLayout {
    /// Banner lines printed above the real header
    pub preamble_lines: usize,
    pub delimiter: u8,
    pub encoding: SourceEncoding,
}

impl Default for InputLayout {
    fn default() -> Self {
        InputLayout {
            preamble_lines: 0,
            delimiter: b',',
            encoding: SourceEncoding::Utf8,
        }
    }
}

/// Date format of a source's date column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Date and time of day, e.g. `%Y-%m-%d %H:%M:%S`
    DateTime(&'static str),
    /// Calendar date only; the timestamp is midnight
    Date(&'static str),
}

impl DateFormat {
    pub fn parse(&self, row: usize, raw: &str) -> Result<NaiveDateTime> {
        let raw = raw.trim();
        let parsed = match self {
            DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(raw, fmt),
            DateFormat::Date(fmt) => {
                NaiveDate::parse_from_str(raw, fmt).map(|d| d.and_time(NaiveTime::MIN))
            }
        };
        parsed.map_err(|e| {
            ConvertError::parse(
                row,
                format!("date '{}' does not match '{}': {}", raw, self.pattern(), e),
            )
        })
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DateTime(fmt) | DateFormat::Date(fmt) => *fmt,
        }
    }
}

// ============================================================================
// RAW TABLE
// ============================================================================

/// A resolved column: its position in the header plus the name for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    index: usize,
    name: &'static str,
}

/// Header plus data rows of an export, preamble already removed
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RawTable {
    /// Decode `bytes` and split them into a table according to `layout`.
    pub fn read(bytes: &[u8], layout: &InputLayout) -> Result<Self> {
        let text = layout.encoding.decode(bytes)?;
        Self::from_text(&text, layout)
    }

    /// Split already-decoded text into a table according to `layout`.
    pub fn from_text(text: &str, layout: &InputLayout) -> Result<Self> {
        let body = skip_lines(text, layout.preamble_lines);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(layout.delimiter)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(RawTable { headers, rows })
    }

    /// Resolve a required column by exact header name.
    pub fn column(&self, name: &'static str) -> Result<Column> {
        self.optional_column(name)
            .ok_or_else(|| ConvertError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Resolve a column some exports carry and others don't.
    pub fn optional_column(&self, name: &'static str) -> Option<Column> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|index| Column { index, name })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in file order, numbered from 1
    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, record)| RawRow { number: i + 1, record })
    }
}

/// One data row. `number` is 1-based and excludes preamble and header.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    pub number: usize,
    record: &'a StringRecord,
}

impl<'a> RawRow<'a> {
    pub fn get(&self, column: &Column) -> Result<&'a str> {
        self.record.get(column.index).ok_or_else(|| {
            ConvertError::parse(
                self.number,
                format!("row has no value for column '{}'", column.name),
            )
        })
    }

    /// Value of a column that may be absent from this export
    pub fn get_optional(&self, column: &Option<Column>) -> Result<Option<&'a str>> {
        column.as_ref().map(|c| self.get(c)).transpose()
    }

    pub fn timestamp(&self, column: &Column, format: DateFormat) -> Result<NaiveDateTime> {
        format.parse(self.number, self.get(column)?)
    }
}

/// Drop the first `n` lines of `text`.
fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

// ============================================================================
// ADAPTER TRAIT
// ============================================================================

/// SourceAdapter - turns one institution's rows into canonical records
///
/// Adding an institution means adding a variant to `SourceType` and one
/// implementation of this trait; existing adapters are untouched.
pub trait SourceAdapter: Send + Sync {
    /// Which institution this adapter understands
    fn source_type(&self) -> SourceType;

    /// Preamble, delimiter and encoding of the export
    fn layout(&self) -> InputLayout {
        InputLayout::default()
    }

    /// Whether `extract` honours the reimbursement flag
    fn supports_reimbursement(&self) -> bool {
        false
    }

    /// Convert rows to records.
    ///
    /// # Arguments
    /// * `cutoff` - exclusive lower bound; rows at or before it are dropped
    /// * `table` - the export with its preamble already removed
    /// * `reimbursement` - keep only spend, as positive claims
    ///
    /// # Returns
    /// Records in input order, or the first parse/validation error.
    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>>;

    /// Decode, split and extract in one go.
    fn extract_bytes(
        &self,
        cutoff: NaiveDateTime,
        bytes: &[u8],
        reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let table = RawTable::read(bytes, &self.layout())?;
        self.extract(cutoff, &table, reimbursement)
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Get the adapter for a source type
///
/// # Example:
/// ```
/// use statement_converter::{get_adapter, SourceAdapter, SourceType};
///
/// let adapter = get_adapter(SourceType::Revolut);
/// assert!(adapter.supports_reimbursement());
/// ```
pub fn get_adapter(source_type: SourceType) -> Box<dyn SourceAdapter> {
    match source_type {
        SourceType::Airwallex => Box::new(AirwallexAdapter::new()),
        SourceType::Currenxie => Box::new(CurrenxieAdapter::new()),
        SourceType::ErsteBank => Box::new(ErsteBankAdapter::new()),
        SourceType::Neat => Box::new(NeatAdapter::new()),
        SourceType::Payoneer => Box::new(PayoneerAdapter::new()),
        SourceType::Revolut => Box::new(RevolutAdapter::new()),
        SourceType::Starling => Box::new(StarlingAdapter::new()),
        SourceType::Wise => Box::new(WiseAdapter::new()),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_codes() {
        assert_eq!(SourceType::ErsteBank.code(), "ERSTEBANK");
        assert_eq!(SourceType::Revolut.code(), "REVOLUT");
        assert_eq!(SourceType::ErsteBank.name(), "Erste Bank");
    }

    #[test]
    fn test_source_type_from_str_ignores_case() {
        assert_eq!("revolut".parse::<SourceType>().unwrap(), SourceType::Revolut);
        assert_eq!("ErsteBank".parse::<SourceType>().unwrap(), SourceType::ErsteBank);
        assert!(matches!(
            "monzo".parse::<SourceType>(),
            Err(ConvertError::Configuration(_))
        ));
    }

    #[test]
    fn test_get_adapter_matches_source() {
        for source in SourceType::ALL {
            assert_eq!(get_adapter(source).source_type(), source);
        }
    }

    #[test]
    fn test_only_revolut_and_starling_reimburse() {
        let reimbursing: Vec<SourceType> = SourceType::ALL
            .into_iter()
            .filter(|s| get_adapter(*s).supports_reimbursement())
            .collect();
        assert_eq!(reimbursing, vec![SourceType::Revolut, SourceType::Starling]);
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(skip_lines("a\nb\nc", 0), "a\nb\nc");
        assert_eq!(skip_lines("a\r\nb\nc", 2), "c");
        assert_eq!(skip_lines("a\nb", 5), "");
    }

    #[test]
    fn test_table_skips_preamble_and_uses_delimiter() {
        let layout = InputLayout {
            preamble_lines: 2,
            delimiter: b';',
            encoding: SourceEncoding::Utf8,
        };
        let text = "Account statement\nGenerated today\nDate;Amount\n01.02.2024;1,00\n";
        let table = RawTable::from_text(text, &layout).unwrap();

        assert_eq!(table.len(), 1);
        let amount = table.column("Amount").unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.number, 1);
        assert_eq!(row.get(&amount).unwrap(), "1,00");
    }

    #[test]
    fn test_missing_column() {
        let table = RawTable::from_text("Date,Amount\n", &InputLayout::default()).unwrap();
        assert!(table.is_empty());
        let err = table.column("Description").unwrap_err();
        assert!(matches!(err, ConvertError::MissingColumn { ref column } if column == "Description"));
        assert!(table.optional_column("Description").is_none());
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let table =
            RawTable::from_text("Date,Amount\n2024-01-01\n", &InputLayout::default()).unwrap();
        let amount = table.column("Amount").unwrap();
        let row = table.rows().next().unwrap();
        assert!(matches!(row.get(&amount), Err(ConvertError::Parse { row: 1, .. })));
    }

    #[test]
    fn test_date_formats() {
        let dt = DateFormat::DateTime("%Y-%m-%d %H:%M:%S")
            .parse(1, "2024-02-29 13:45:00")
            .unwrap();
        assert_eq!(dt.to_string(), "2024-02-29 13:45:00");

        let d = DateFormat::Date("%d/%m/%Y").parse(1, "05/03/2024").unwrap();
        assert_eq!(d.to_string(), "2024-03-05 00:00:00");

        let err = DateFormat::Date("%d/%m/%Y").parse(9, "2024-03-05").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { row: 9, .. }));
    }
}
