// Revolut account statement export
//
// Type,Product,Started Date,Completed Date,Description,Amount,Fee,Currency,State,Balance
//
// Only COMPLETED rows are converted. Pending and reverted rows have an empty
// Completed Date, so the state is checked before the date is parsed.

use crate::error::Result;
use crate::money::{parse_amount, reimbursable};
use crate::parser::{DateFormat, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::{after_cutoff, SECONDS_FORMAT};
use chrono::NaiveDateTime;
use tracing::debug;

const DATE_COLUMN: &str = "Completed Date";
const DESCRIPTION_COLUMN: &str = "Description";
const AMOUNT_COLUMN: &str = "Amount";
const STATE_COLUMN: &str = "State";

const COMPLETED: &str = "COMPLETED";

pub struct RevolutAdapter;

impl RevolutAdapter {
    pub fn new() -> Self {
        RevolutAdapter
    }
}

impl Default for RevolutAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for RevolutAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Revolut
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
        let description_col = table.column(DESCRIPTION_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;
        let state_col = table.column(STATE_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let state = row.get(&state_col)?;
            if state != COMPLETED {
                debug!(row = row.number, state, "Skipping non-completed Revolut row");
                continue;
            }

            let timestamp = row.timestamp(&date_col, DateFormat::DateTime(SECONDS_FORMAT))?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let description = row.get(&description_col)?.replace(',', "");
            let amount = parse_amount(row.number, row.get(&amount_col)?)?;

            let amount = if reimbursement {
                // Refunds are not reimbursable
                match reimbursable(amount) {
                    Some(claim) => claim,
                    None => continue,
                }
            } else {
                amount
            };

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Revolut records", records.len());
        Ok(records)
    }
}
