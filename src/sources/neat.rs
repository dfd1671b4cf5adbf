// Neat business account export
//
// Transaction Date,Description,Transaction Amount[,Settlement Amount,...]
// 2024-03-02 10:15:00,Payment from ACME,1500.00

use crate::error::Result;
use crate::money::parse_amount;
use crate::parser::{DateFormat, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::{after_cutoff, SECONDS_FORMAT};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

const DATE_COLUMN: &str = "Transaction Date";
const DESCRIPTION_COLUMN: &str = "Description";
const AMOUNT_COLUMN: &str = "Transaction Amount";
const SETTLEMENT_COLUMN: &str = "Settlement Amount";

pub struct NeatAdapter;

impl NeatAdapter {
    pub fn new() -> Self {
        NeatAdapter
    }
}

impl Default for NeatAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for NeatAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Neat
    }

    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        _reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let date_col = table.column(DATE_COLUMN)?;
        let description_col = table.column(DESCRIPTION_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;
        let settlement_col = table.optional_column(SETTLEMENT_COLUMN);

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DateFormat::DateTime(SECONDS_FORMAT))?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let amount = parse_amount(row.number, row.get(&amount_col)?)?;

            // A differing settlement amount is reported, never fatal: the
            // transaction amount is what hit the account.
            if let Some(raw) = row.get_optional(&settlement_col)? {
                if !raw.trim().is_empty() {
                    let settled = parse_amount(row.number, raw)?;
                    if settled != amount {
                        warn!(
                            row = row.number,
                            %amount,
                            %settled,
                            "Neat settlement amount differs from transaction amount"
                        );
                    }
                }
            }

            records.push(CanonicalRecord::new(
                timestamp.date(),
                amount,
                row.get(&description_col)?,
            ));
        }

        debug!("Extracted {} Neat records", records.len());
        Ok(records)
    }
}
