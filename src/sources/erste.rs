// Erste Bank (Serbia) account turnover export
//
// Windows-1252, `;` separated, one banner line. Incoming and outgoing
// amounts live in separate columns and use continental separators
// (`1.234,56`). Header names are kept exactly as they decode from the
// code page, e.g. "Opis plaæanja, kurs".

use crate::encoding::SourceEncoding;
use crate::error::{ConvertError, Result};
use crate::money::{negate, normalize_continental, parse_amount};
use crate::parser::{DateFormat, InputLayout, RawTable, SourceAdapter, SourceType};
use crate::record::CanonicalRecord;
use crate::sources::after_cutoff;
use chrono::NaiveDateTime;
use tracing::debug;

const PREAMBLE_LINES: usize = 1;

/// Execution date
const DATE_COLUMN: &str = "Datum izvršenja";
/// Payment description
const DESCRIPTION_COLUMN: &str = "Opis plaæanja, kurs";
/// Incoming transfers
const INBOUND_COLUMN: &str = "Uplate";
/// Outgoing payments
const OUTBOUND_COLUMN: &str = "Isplate";
/// Counterparty
const RECIPIENT_COLUMN: &str = "Primalac";

const DATE_FORMAT: DateFormat = DateFormat::Date("%d.%m.%Y");

pub struct ErsteBankAdapter;

impl ErsteBankAdapter {
    pub fn new() -> Self {
        ErsteBankAdapter
    }
}

impl Default for ErsteBankAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for ErsteBankAdapter {
    fn source_type(&self) -> SourceType {
        SourceType::ErsteBank
    }

    fn layout(&self) -> InputLayout {
        InputLayout {
            preamble_lines: PREAMBLE_LINES,
            delimiter: b';',
            encoding: SourceEncoding::Windows1252,
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
        let inbound_col = table.column(INBOUND_COLUMN)?;
        let outbound_col = table.column(OUTBOUND_COLUMN)?;
        let recipient_col = table.column(RECIPIENT_COLUMN)?;

        let mut records = Vec::new();

        for row in table.rows() {
            let timestamp = row.timestamp(&date_col, DATE_FORMAT)?;
            if !after_cutoff(timestamp, cutoff) {
                continue;
            }

            let mut description = row.get(&description_col)?.to_string();
            let inbound = normalize_continental(row.get(&inbound_col)?);
            let outbound = normalize_continental(row.get(&outbound_col)?);
            let recipient = row.get(&recipient_col)?;

            let amount = match (inbound.is_empty(), outbound.is_empty()) {
                (false, false) => {
                    return Err(ConvertError::validation(
                        row.number,
                        format!("both inbound and outbound for same row ({})", description),
                    ));
                }
                (true, true) => {
                    return Err(ConvertError::validation(
                        row.number,
                        format!("neither inbound nor outbound amount ({})", description),
                    ));
                }
                (false, true) => {
                    if !recipient.is_empty() {
                        description.push_str(&format!(" from {}", recipient));
                    }
                    parse_amount(row.number, &inbound)?
                }
                (true, false) => {
                    if !recipient.is_empty() {
                        description.push_str(&format!(" to {}", recipient));
                    }
                    negate(parse_amount(row.number, &outbound)?)
                }
            };

            records.push(CanonicalRecord::new(timestamp.date(), amount, description));
        }

        debug!("Extracted {} Erste Bank records", records.len());
        Ok(records)
    }
}
