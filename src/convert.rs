// 🔁 Orchestrator
//
// Validate the request, pick the adapter and writer, run them. Configuration
// problems are reported before the input file is even opened, and the output
// only appears once every record has been written.

use crate::error::{ConvertError, Result};
use crate::parser::{get_adapter, SourceAdapter, SourceType};
use crate::writers::{write_records, OutputTarget};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default cutoff: far enough back to convert every row of any realistic export.
pub fn default_cutoff() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Everything one conversion run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub source: SourceType,
    pub target: OutputTarget,
    pub reimbursement: bool,
    /// Exclusive lower bound on transaction timestamps
    pub cutoff: NaiveDateTime,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, source: SourceType, target: OutputTarget) -> Self {
        ConversionRequest {
            input: input.into(),
            source,
            target,
            reimbursement: false,
            cutoff: default_cutoff(),
        }
    }

    pub fn with_reimbursement(mut self, reimbursement: bool) -> Self {
        self.reimbursement = reimbursement;
        self
    }

    pub fn with_cutoff(mut self, cutoff: NaiveDateTime) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Check the source / target / reimbursement combination.
    ///
    /// Sources that hold reimbursable spend must be converted in
    /// reimbursement mode; every other source must not be, and reimbursement
    /// claims only go to Wave.
    pub fn validate(&self) -> Result<()> {
        let reimbursing = get_adapter(self.source).supports_reimbursement();

        if reimbursing && !self.reimbursement {
            return Err(ConvertError::configuration(format!(
                "{} exports are reimbursement accounts; expected the reimbursement flag",
                self.source.name()
            )));
        }

        if self.reimbursement && !reimbursing {
            return Err(ConvertError::configuration(format!(
                "did not expect the reimbursement flag for {}",
                self.source.name()
            )));
        }

        if self.reimbursement && self.target != OutputTarget::Wave {
            return Err(ConvertError::configuration(format!(
                "did not expect the reimbursement flag for target {}",
                self.target.name()
            )));
        }

        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        output_path(&self.input, self.source, self.target)
    }
}

/// `<dir>/<stem>_CONVERTED_<SOURCE>_TO_<TARGET><.ext>`
pub fn output_path(input: &Path, source: SourceType, target: OutputTarget) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = input.file_stem() {
        name.push(stem);
    }
    name.push(format!("_CONVERTED_{}_TO_{}", source.code(), target.code()));
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// What a finished run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub records_written: usize,
}

/// Run one conversion.
///
/// `confirm_overwrite` is asked only when the output path already exists;
/// returning `false` aborts the run without touching anything.
pub fn convert<F>(request: &ConversionRequest, confirm_overwrite: F) -> Result<ConversionSummary>
where
    F: FnOnce(&Path) -> bool,
{
    request.validate()?;

    let output = request.output_path();
    if output.exists() && !confirm_overwrite(&output) {
        return Err(ConvertError::configuration(format!(
            "refusing to overwrite existing file {}",
            output.display()
        )));
    }

    info!(
        input = %request.input.display(),
        source = request.source.code(),
        target = request.target.code(),
        reimbursement = request.reimbursement,
        cutoff = %request.cutoff,
        "Converting statement"
    );

    let adapter = get_adapter(request.source);
    let bytes = fs::read(&request.input)?;
    let records = adapter.extract_bytes(request.cutoff, &bytes, request.reimbursement)?;

    // Stage next to the destination so the final rename stays on one filesystem
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
    write_records(request.target, staged.as_file_mut(), &records)?;
    staged.persist(&output).map_err(|e| ConvertError::Io(e.error))?;

    info!(output = %output.display(), records = records.len(), "Conversion finished");

    Ok(ConversionSummary {
        output,
        records_written: records.len(),
    })
}
