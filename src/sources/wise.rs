// Wise transfer history export
//
// Amounts are unsigned; Direction (IN/OUT) carries the sign. The source fee
// is added back so the record shows what actually left or entered the
// account.

use crate::error::{ConvertError, Result};
use crate::money::{negate, parse_amount, round_half_up};
use crate::parser::{DateFormat, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::{after_cutoff, SECONDS_FORMAT};
use chrono::NaiveDateTime;
use tracing::debug;

const DATE_COLUMN: &str = "Created on";
const AMOUNT_COLUMN: &str = "Source amount (after fees)";
const FEE_COLUMN: &str = "Source fee amount";
const DIRECTION_COLUMN: &str = "Direction";
const SOURCE_NAME_COLUMN: &str = "Source name";
const TARGET_NAME_COLUMN: &str = "Target name";
/// Not present in every export
const STATUS_COLUMN: &str = "Status";

const COMPLETED: &str = "COMPLETED";

pub struct WiseAdapter;

impl WiseAdapter {
    pub fn new() -> Self {
        WiseAdapter
    }
}

impl Default for WiseAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for WiseAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Wise
    }

    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        _reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let date_col = table.column(DATE_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;
        let fee_col = table.column(FEE_COLUMN)?;
        let direction_col = table.column(DIRECTION_COLUMN)?;
        let source_name_col = table.column(SOURCE_NAME_COLUMN)?;
        let target_name_col = table.column(TARGET_NAME_COLUMN)?;
        let status_col = table.optional_column(STATUS_COLUMN);

        let mut records = Vec::new();

        for row in table.rows() {
            if let Some(status) = row.get_optional(&status_col)? {
                if status != COMPLETED {
                    debug!(row = row.number, status, "Skipping non-completed Wise transfer");
                    continue;
                }
            }

            let timestamp = row.timestamp(&date_col, DateFormat::DateTime(SECONDS_FORMAT))?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let base = parse_amount(row.number, row.get(&amount_col)?)?;
            let fee = parse_amount(row.number, row.get(&fee_col)?)?;
            let gross = round_half_up(base + fee);

            let direction = row.get(&direction_col)?;
            let (amount, description) = match direction {
                "IN" => (
                    gross,
                    format!("Received from {}", row.get(&source_name_col)?),
                ),
                "OUT" => (
                    negate(gross),
                    format!("Sent to {}", row.get(&target_name_col)?),
                ),
                other => {
                    return Err(ConvertError::validation(
                        row.number,
                        format!("unexpected transfer direction '{}'", other),
                    ));
                }
            };

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Wise records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::InputLayout;
    use crate::sources::test_support::{at, beginning};

    const HEADER: &str = "ID,Status,Direction,Created on,Source fee amount,Source amount (after fees),Source name,Target name\n";

    fn table(header: &str, body: &str) -> RawTable {
        RawTable::from_text(&format!("{}{}", header, body), &InputLayout::default()).unwrap()
    }

    #[test]
    fn test_direction_sets_sign_and_description() {
        let body = "\
TRANSFER-1,COMPLETED,IN,2024-03-02 10:00:00,0,2500.00,ACME Corp,Example Ltd
TRANSFER-2,COMPLETED,OUT,2024-03-03 10:00:00,4.35,995.65,Example Ltd,Jane Doe
";
        let records = WiseAdapter::new().extract(beginning(), &table(HEADER, body), false).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount.to_string(), "2500.00");
        assert_eq!(records[0].description, "Received from ACME Corp");
        assert_eq!(records[1].amount.to_string(), "-1000.00");
        assert_eq!(records[1].description, "Sent to Jane Doe");
    }

    #[test]
    fn test_fee_is_rounded_half_up() {
        let body = "TRANSFER-3,COMPLETED,OUT,2024-03-03 10:00:00,0.125,10,Example Ltd,Shop\n";
        let records = WiseAdapter::new().extract(beginning(), &table(HEADER, body), false).unwrap();
        assert_eq!(records[0].amount.to_string(), "-10.13");
    }

    #[test]
    fn test_unknown_direction_is_fatal() {
        let body = "TRANSFER-4,COMPLETED,NEUTRAL,2024-03-03 10:00:00,0,1.00,A,B\n";
        let err = WiseAdapter::new()
            .extract(beginning(), &table(HEADER, body), false)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Validation { row: 1, .. }));
    }

    #[test]
    fn test_cancelled_transfers_skipped() {
        let body = "\
TRANSFER-5,CANCELLED,OUT,,0,50.00,Example Ltd,Jane Doe
TRANSFER-6,COMPLETED,OUT,2024-03-03 10:00:00,0,50.00,Example Ltd,Jane Doe
";
        let records = WiseAdapter::new().extract(beginning(), &table(HEADER, body), false).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_export_without_status_column() {
        let header = "Direction,Created on,Source fee amount,Source amount (after fees),Source name,Target name\n";
        let body = "\
IN,2024-03-01 00:00:00,0,1.00,A,B
IN,2024-03-01 00:00:01,0,2.00,A,B
";
        let records = WiseAdapter::new()
            .extract(at("2024-03-01 00:00:00"), &table(header, body), false)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount.to_string(), "2.00");
    }
}
