//! Per-round reporting of state counts to CSV.
//!
//! The report is what a renderer or an analysis script consumes: one row per round with the
//! number of agents in each disease state.

use std::ffi::OsStr;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use log::trace;

use crate::error::SimError;
use crate::population::StateCounts;

/// Where report files go and what to do when one already exists.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub file_prefix: String,
    pub output_dir: PathBuf,
    pub overwrite: bool,
}

impl ReportOptions {
    #[must_use]
    pub fn new() -> Self {
        ReportOptions {
            file_prefix: String::new(),
            output_dir: PathBuf::from("."),
            overwrite: false,
        }
    }

    /// Sets the file prefix option (e.g., "report_")
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut ReportOptions {
        self.file_prefix = file_prefix;
        self
    }

    /// Sets the directory where reports will be output
    pub fn directory(&mut self, directory: PathBuf) -> &mut ReportOptions {
        self.output_dir = directory;
        self
    }

    /// Sets whether to overwrite existing reports of the same name if they exist
    pub fn overwrite(&mut self, overwrite: bool) -> &mut ReportOptions {
        self.overwrite = overwrite;
        self
    }

    /// The path of the report called `short_name`.
    #[must_use]
    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.csv", self.file_prefix, short_name))
    }
}

// Checks that the path is valid. Creates the file and all parent directories if
// they do not exist.
fn generate_validate_filepath(path: &Path, overwrite: bool) -> Result<File, SimError> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => {
            if !overwrite && path.exists() {
                return Err(SimError::ReportError(format!(
                    "report file already exists: {}. Use overwrite to replace it",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            Ok(File::create(path)?)
        }
        _ => Err(SimError::ReportError(
            "Report output files must be CSVs at this time".to_string(),
        )),
    }
}

/// Writes one `StateCounts` row per round.
pub struct RoundReportWriter {
    path: PathBuf,
    writer: Writer<File>,
}

impl RoundReportWriter {
    /// Creates the report file `<output_dir>/<file_prefix><short_name>.csv`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::ReportError` if the file exists and `overwrite` is off, or an I/O
    /// error if the file or its directories cannot be created.
    pub fn create(options: &ReportOptions, short_name: &str) -> Result<Self, SimError> {
        let path = options.path_for(short_name);
        let file = generate_validate_filepath(&path, options.overwrite)?;
        trace!("created report {}", path.display());
        Ok(RoundReportWriter {
            path,
            writer: Writer::from_writer(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a row and flushes it to disk.
    ///
    /// # Errors
    ///
    /// Returns a CSV or I/O error if the row cannot be written.
    pub fn send(&mut self, counts: &StateCounts) -> Result<(), SimError> {
        self.writer.serialize(counts)?;
        self.writer.flush()?;
        Ok(())
    }
}
