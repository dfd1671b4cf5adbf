// Starling Bank statement export
//
// Date,Counter Party,Reference,Type,Amount (GBP),Balance (GBP)
// 05/03/2024,Tesco,TESCO STORES 1234,CARD PAYMENT,-12.40,987.60

use crate::encoding::SourceEncoding;
use crate::error::Result;
use crate::money::{parse_amount, reimbursable};
use crate::parser::{DateFormat, InputLayout, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::after_cutoff;
use chrono::NaiveDateTime;
use tracing::debug;

const DATE_COLUMN: &str = "Date";
const COUNTER_PARTY_COLUMN: &str = "Counter Party";
const REFERENCE_COLUMN: &str = "Reference";
const AMOUNT_COLUMN: &str = "Amount (GBP)";

const DATE_FORMAT: DateFormat = DateFormat::Date("%d/%m/%Y");

pub struct StarlingAdapter;

impl StarlingAdapter {
    pub fn new() -> Self {
        StarlingAdapter
    }
}

impl Default for StarlingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Counterparty alone when the reference just repeats it, otherwise both.
pub fn describe(counter_party: &str, reference: &str) -> String {
    let counter_party = counter_party.trim();
    let reference = reference.trim();
    if counter_party.to_lowercase() == reference.to_lowercase() {
        counter_party.to_string()
    } else {
        format!("{} (to: {})", reference, counter_party)
    }
}

impl SourceAdapter for StarlingAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Starling
    }

    fn layout(&self) -> InputLayout {
        InputLayout {
            encoding: SourceEncoding::UnicodeEscape,
            ..InputLayout::default()
        }
    }

    fn supports_reimbursement(&self) -> bool {
        true
    }

    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let date_col = table.column(DATE_COLUMN)?;
        let counter_party_col = table.column(COUNTER_PARTY_COLUMN)?;
        let reference_col = table.column(REFERENCE_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DATE_FORMAT)?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let description = describe(row.get(&counter_party_col)?, row.get(&reference_col)?);
            let amount = parse_amount(row.number, row.get(&amount_col)?)?;

            let amount = if reimbursement {
                match reimbursable(amount) {
                    Some(claim) => claim,
                    None => continue,
                }
            } else {
                amount
            };

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Starling records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{at, beginning};

    const HEADER: &str = "Date,Counter Party,Reference,Type,Amount (GBP),Balance (GBP)\n";

    fn extract(body: &str, cutoff: NaiveDateTime, reimbursement: bool) -> Vec<CanonicalRecord> {
        let text = format!("{}{}", HEADER, body);
        StarlingAdapter::new()
            .extract_bytes(cutoff, text.as_bytes(), reimbursement)
            .unwrap()
    }

    #[test]
    fn test_describe_dedupes_case_insensitively() {
        assert_eq!(describe("Tesco", "TESCO"), "Tesco");
        assert_eq!(describe(" Tesco ", "tesco"), "Tesco");
        assert_eq!(describe("Jane Doe", "Rent March"), "Rent March (to: Jane Doe)");
    }

    #[test]
    fn test_extract() {
        let records = extract(
            "05/03/2024,Tesco,TESCO,CARD PAYMENT,-12.40,987.60
06/03/2024,ACME Ltd,INV-42,FASTER PAYMENT,500.00,1487.60
",
            beginning(),
            false,
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].iso_date(), "2024-03-05");
        assert_eq!(records[0].description, "Tesco");
        assert_eq!(records[0].amount.to_string(), "-12.40");
        assert_eq!(records[1].description, "INV-42 (to: ACME Ltd)");
        assert_eq!(records[1].amount.to_string(), "500.00");
    }

    #[test]
    fn test_cutoff_boundary() {
        let records = extract(
            "05/03/2024,A,A,CARD PAYMENT,-1.00,0
06/03/2024,B,B,CARD PAYMENT,-2.00,0
",
            at("2024-03-05 00:00:00"),
            false,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "B");
    }

    #[test]
    fn test_reimbursement_drops_refunds() {
        let records = extract(
            "05/03/2024,Trainline,Trainline,CARD PAYMENT,-45.5,0
06/03/2024,Trainline,Trainline,REFUND,45.50,0
",
            beginning(),
            true,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount.to_string(), "45.50");
    }

    #[test]
    fn test_escaped_unicode_is_decoded() {
        let records = extract(
            "05/03/2024,Caf\\u00e9 Nero,Caf\\u00e9 Nero,CARD PAYMENT,-3.10,0\n",
            beginning(),
            false,
        );
        assert_eq!(records[0].description, "Café Nero");
    }
}
