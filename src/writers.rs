// 📤 Output Writers
// Serialize canonical records the way each accounting platform imports them.

use crate::error::{ConvertError, Result};
use crate::record::{CanonicalRecord, HEADER};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Accounting platform the converted file is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputTarget {
    FreeAgent,
    Wave,
}

impl OutputTarget {
    pub const ALL: [OutputTarget; 2] = [OutputTarget::FreeAgent, OutputTarget::Wave];

    pub fn name(&self) -> &'static str {
        match self {
            OutputTarget::FreeAgent => "FreeAgent",
            OutputTarget::Wave => "Wave",
        }
    }

    /// Label used on the command line and in output file names
    pub fn code(&self) -> &'static str {
        match self {
            OutputTarget::FreeAgent => "FREEAGENT",
            OutputTarget::Wave => "WAVE",
        }
    }

    /// Wave wants a header row, FreeAgent rejects one
    pub fn writes_header(&self) -> bool {
        matches!(self, OutputTarget::Wave)
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OutputTarget {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        OutputTarget::ALL
            .into_iter()
            .find(|target| target.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ConvertError::configuration(format!(
                    "unknown target '{}' (expected FREEAGENT or WAVE)",
                    s
                ))
            })
    }
}

/// Write `records` as CSV for `target`.
///
/// The header comes from the fixed schema, so an empty slice still produces a
/// valid file (header only for Wave, empty for FreeAgent).
pub fn write_records<W: Write>(
    target: OutputTarget,
    out: W,
    records: &[CanonicalRecord],
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    if target.writes_header() {
        wtr.write_record(HEADER)?;
    }

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render `records` to a string; handy for previews and tests.
pub fn render(target: OutputTarget, records: &[CanonicalRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(target, &mut buf, records)?;
    String::from_utf8(buf).map_err(|e| ConvertError::Io(std::io::Error::other(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn records() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new(
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                Decimal::new(150000, 2),
                "Payment from ACME",
            ),
            CanonicalRecord::new(
                NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                Decimal::new(-645, 2),
                "Pret, London",
            ),
        ]
    }

    #[test]
    fn test_wave_writes_header_first() {
        let out = render(OutputTarget::Wave, &records()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "date,amount,description");
        assert_eq!(lines[1], "2024-03-02,1500.00,Payment from ACME");
        assert_eq!(lines[2], "2024-03-03,-6.45,\"Pret, London\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_freeagent_starts_with_first_record() {
        let out = render(OutputTarget::FreeAgent, &records()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "2024-03-02,1500.00,Payment from ACME");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(render(OutputTarget::Wave, &[]).unwrap(), "date,amount,description\r\n");
        assert_eq!(render(OutputTarget::FreeAgent, &[]).unwrap(), "");
    }

    #[test]
    fn test_lines_end_with_crlf() {
        let out = render(OutputTarget::FreeAgent, &records()[..1]).unwrap();
        assert_eq!(out, "2024-03-02,1500.00,Payment from ACME\r\n");
    }

    #[test]
    fn test_target_from_str() {
        assert_eq!("wave".parse::<OutputTarget>().unwrap(), OutputTarget::Wave);
        assert_eq!("FreeAgent".parse::<OutputTarget>().unwrap(), OutputTarget::FreeAgent);
        assert!("xero".parse::<OutputTarget>().is_err());
    }
}
