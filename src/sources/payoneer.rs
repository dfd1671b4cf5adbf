// Payoneer transaction export
//
// UTF-8 with a byte-order mark. Dates look like "5 Mar, 2024" (quoted, since
// they contain the delimiter) and amounts carry thousands separators.

use crate::encoding::SourceEncoding;
use crate::error::Result;
use crate::money::{parse_amount, strip_thousands};
use crate::parser::{DateFormat, InputLayout, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::after_cutoff;
use chrono::NaiveDateTime;
use tracing::debug;

const DATE_COLUMN: &str = "Date";
const DESCRIPTION_COLUMN: &str = "Description";
const AMOUNT_COLUMN: &str = "Amount";

const DATE_FORMAT: DateFormat = DateFormat::Date("%d %b, %Y");

pub struct PayoneerAdapter;

impl PayoneerAdapter {
    pub fn new() -> Self {
        PayoneerAdapter
    }
}

impl Default for PayoneerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for PayoneerAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Payoneer
    }

    fn layout(&self) -> InputLayout {
        InputLayout {
            encoding: SourceEncoding::Utf8Bom,
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
        let description_col = table.column(DESCRIPTION_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DATE_FORMAT)?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            // FreeAgent chokes on commas
            let amount = parse_amount(row.number, &strip_thousands(row.get(&amount_col)?))?;
            let description = row.get(&description_col)?.replace(',', "");

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Payoneer records", records.len());
        Ok(records)
    }
}
