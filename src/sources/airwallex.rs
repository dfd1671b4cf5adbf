// Airwallex account activity export
//
// Five banner lines precede the header. Description is built from the
// transaction type plus the counterparty where the type has one.

use crate::error::{ConvertError, Result};
use crate::money::parse_amount;
use crate::parser::{DateFormat, InputLayout, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::{after_cutoff, SECONDS_FORMAT};
use chrono::NaiveDateTime;
use std::str::FromStr;
use tracing::debug;

const PREAMBLE_LINES: usize = 5;

const DATE_COLUMN: &str = "Created At";
const AMOUNT_COLUMN: &str = "Net Amount";
const TYPE_COLUMN: &str = "Type";
const REMITTER_COLUMN: &str = "Remitter Name";
const BENEFICIARY_COLUMN: &str = "Beneficiary Bank Account Name";

/// Transaction types Airwallex reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirwallexType {
    Deposit,
    Fee,
    Payout,
}

impl AirwallexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AirwallexType::Deposit => "Deposit",
            AirwallexType::Fee => "Fee",
            AirwallexType::Payout => "Payout",
        }
    }
}

impl FromStr for AirwallexType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "Deposit" => Ok(AirwallexType::Deposit),
            "Fee" => Ok(AirwallexType::Fee),
            "Payout" => Ok(AirwallexType::Payout),
            _ => Err(()),
        }
    }
}

pub struct AirwallexAdapter;

impl AirwallexAdapter {
    pub fn new() -> Self {
        AirwallexAdapter
    }
}

impl Default for AirwallexAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for AirwallexAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Airwallex
    }

    fn layout(&self) -> InputLayout {
        InputLayout {
            preamble_lines: PREAMBLE_LINES,
            ..InputLayout::default()
        }
    }

    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        _reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let date_col = table.column(DATE_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;
        let type_col = table.column(TYPE_COLUMN)?;
        let remitter_col = table.column(REMITTER_COLUMN)?;
        let beneficiary_col = table.column(BENEFICIARY_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DateFormat::DateTime(SECONDS_FORMAT))?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let raw_type = row.get(&type_col)?;
            let tx_type = raw_type.parse::<AirwallexType>().map_err(|_| {
                ConvertError::validation(
                    row.number,
                    format!("unrecognized Airwallex type '{}'", raw_type),
                )
            })?;

            let description = match tx_type {
                AirwallexType::Deposit => {
                    format!("{} from {}", tx_type.as_str(), row.get(&remitter_col)?)
                }
                AirwallexType::Payout => {
                    format!("{} to {}", tx_type.as_str(), row.get(&beneficiary_col)?)
                }
                AirwallexType::Fee => tx_type.as_str().to_string(),
            };

            let amount = parse_amount(row.number, row.get(&amount_col)?)?;
            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Airwallex records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::{at, beginning};

    const BANNER: &str = "Airwallex
Account Statement
Account: Example Ltd
Period: 2024-03-01 - 2024-03-31
Currency: USD
";

    fn extract(body: &str, cutoff: NaiveDateTime) -> Result<Vec<CanonicalRecord>> {
        let text = format!("{}{}", BANNER, body);
        let adapter = AirwallexAdapter::new();
        adapter.extract_bytes(cutoff, text.as_bytes(), false)
    }

    const HEADER: &str =
        "Created At,Type,Net Amount,Remitter Name,Beneficiary Bank Account Name\n";

    #[test]
    fn test_descriptions_by_type() {
        let body = format!(
            "{}{}",
            HEADER,
            "2024-03-02 09:00:00,Deposit,2500.00,ACME Corp,
2024-03-03 09:00:00,Fee,-15.00,,
2024-03-04 09:00:00,Payout,-1000.00,,Jane Doe
"
        );
        let records = extract(&body, beginning()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].description, "Deposit from ACME Corp");
        assert_eq!(records[0].amount.to_string(), "2500.00");
        assert_eq!(records[1].description, "Fee");
        assert_eq!(records[2].description, "Payout to Jane Doe");
        assert_eq!(records[2].amount.to_string(), "-1000.00");
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let body = format!("{}{}", HEADER, "2024-03-02 09:00:00,Conversion,1.00,,\n");
        let err = extract(&body, beginning()).unwrap_err();
        assert!(matches!(err, ConvertError::Validation { row: 1, .. }));
    }

    #[test]
    fn test_cutoff_is_checked_before_type() {
        // Old rows are dropped without looking at their type
        let body = format!("{}{}", HEADER, "2024-01-01 00:00:00,Conversion,1.00,,\n");
        let records = extract(&body, at("2024-01-01 00:00:00")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_without_preamble_header_is_missing() {
        let adapter = AirwallexAdapter::new();
        let err = adapter
            .extract_bytes(beginning(), HEADER.as_bytes(), false)
            .unwrap_err();
        assert!(matches!(err, ConvertError::MissingColumn { .. }));
    }
}
