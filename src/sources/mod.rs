// 🏦 Source Adapters
//
// One file per institution. Adapters share nothing but the canonical record,
// the raw table and the helpers below; each can be read and tested alone.

pub mod airwallex;
pub mod currenxie;
pub mod erste;
pub mod neat;
pub mod payoneer;
pub mod revolut;
pub mod starling;
pub mod wise;

pub use airwallex::AirwallexAdapter;
pub use currenxie::CurrenxieAdapter;
pub use erste::ErsteBankAdapter;
pub use neat::NeatAdapter;
pub use payoneer::PayoneerAdapter;
pub use revolut::RevolutAdapter;
pub use starling::StarlingAdapter;
pub use wise::WiseAdapter;

use chrono::NaiveDateTime;

/// Shared timestamp format of the fintech exports (Neat, Airwallex, Revolut, Wise)
pub(crate) const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Cutoff is exclusive: a row stamped exactly at the cutoff was already imported.
pub(crate) fn after_cutoff(timestamp: NaiveDateTime, cutoff: NaiveDateTime) -> bool {
    timestamp > cutoff
}
