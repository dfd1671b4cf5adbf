// 🧾 Canonical Record - the one shape every adapter produces
//
// date, amount, description. Nothing more, nothing less: every writer
// consumes this struct, whichever institution the row came from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

// ============================================================================
// FIELD NAMES
// ============================================================================

pub const DATE_HEADER: &str = "date";
pub const AMOUNT_HEADER: &str = "amount";
pub const DESCRIPTION_HEADER: &str = "description";

/// Column order of every converted file
pub const HEADER: [&str; 3] = [DATE_HEADER, AMOUNT_HEADER, DESCRIPTION_HEADER];

/// Output date format (ISO calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// CANONICAL RECORD
// ============================================================================

/// A normalized statement line.
///
/// `amount` follows one sign convention for all sources: inflow positive,
/// outflow negative. Its scale is kept as the source wrote it (or two
/// decimals when the adapter had to compute it), so `12.50` stays `12.50`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    #[serde(rename = "date", serialize_with = "iso_date")]
    pub date: NaiveDate,

    #[serde(rename = "amount", serialize_with = "plain_decimal")]
    pub amount: Decimal,

    #[serde(rename = "description")]
    pub description: String,
}

impl CanonicalRecord {
    pub fn new(date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        CanonicalRecord {
            date,
            amount,
            description: description.into(),
        }
    }

    /// Date as written to the output file
    pub fn iso_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

fn iso_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&date.format(DATE_FORMAT).to_string())
}

fn plain_decimal<S: Serializer>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&amount.to_string())
}
