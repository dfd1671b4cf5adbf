// Statement Converter - Core Library
// Exposes adapters, writers and the orchestrator for the CLI and tests

pub mod convert;
pub mod encoding;
pub mod error;
pub mod money;
pub mod parser;
pub mod record;
pub mod sources;
pub mod writers;

// Re-export commonly used types
pub use convert::{convert, default_cutoff, output_path, ConversionRequest, ConversionSummary};
pub use encoding::SourceEncoding;
pub use error::{ConvertError, Result};
pub use parser::{get_adapter, DateFormat, InputLayout, RawTable, SourceAdapter, SourceType};
pub use record::CanonicalRecord;
pub use sources::{
    AirwallexAdapter, CurrenxieAdapter, ErsteBankAdapter, NeatAdapter, PayoneerAdapter,
    RevolutAdapter, StarlingAdapter, WiseAdapter,
};
pub use writers::{render, write_records, OutputTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
