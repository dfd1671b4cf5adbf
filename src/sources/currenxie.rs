// Currenxie account statement export
//
// *Date,*Amount,Description,Reference
// 03/05/2024,-250.00,Transfer,INV-42

use crate::error::Result;
use crate::money::parse_amount;
use crate::parser::{DateFormat, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::after_cutoff;
use chrono::NaiveDateTime;
use tracing::debug;

const DATE_COLUMN: &str = "*Date";
const AMOUNT_COLUMN: &str = "*Amount";
const DESCRIPTION_COLUMN: &str = "Description";
const REFERENCE_COLUMN: &str = "Reference";

const DATE_FORMAT: DateFormat = DateFormat::Date("%m/%d/%Y");

pub struct CurrenxieAdapter;

impl CurrenxieAdapter {
    pub fn new() -> Self {
        CurrenxieAdapter
    }
}

impl Default for CurrenxieAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// "Description - Reference" when there is a reference, the raw description otherwise.
pub fn describe(description: &str, reference: &str) -> String {
    if reference.is_empty() {
        description.to_string()
    } else {
        format!("{} - {}", description, reference).trim().to_string()
    }
}

impl SourceAdapter for CurrenxieAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::Currenxie
    }

    fn extract(
        &self,
        cutoff: NaiveDateTime,
        table: &RawTable,
        _reimbursement: bool,
    ) -> Result<Vec<CanonicalRecord>> {
        let date_col = table.column(DATE_COLUMN)?;
        let amount_col = table.column(AMOUNT_COLUMN)?;
        let description_col = table.column(DESCRIPTION_COLUMN)?;
        let reference_col = table.column(REFERENCE_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DATE_FORMAT)?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let description = describe(row.get(&description_col)?, row.get(&reference_col)?);
            let amount = parse_amount(row.number, row.get(&amount_col)?)?;

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Currenxie records", records.len());
        Ok(records)
    }
}
