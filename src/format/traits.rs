//! Trait definitions for session format implementations.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CHUNK_ROWS, DEFAULT_IMPEDANCE_CEILING};
use crate::format::document::SessionData;
use crate::format::error::DataError;

/// Trait for recording import/export implementations.
///
/// Each format (raw device export, processed CSV, native JSON) implements
/// this trait to convert between a file and [`SessionData`]. Implementations
/// work on streams; the path-based methods wrap them with buffered files.
pub trait SessionFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "raw", "csv", "scribe").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses, without the leading dot.
    fn extensions(&self) -> &[&'static str];

    /// Whether this format can be written.
    fn supports_export(&self) -> bool;

    /// Whether this format carries labels.
    fn supports_labels(&self) -> bool;

    /// Parse session data from a reader.
    fn import_from_reader(
        &self,
        reader: &mut dyn BufRead,
        options: &ImportOptions,
    ) -> Result<SessionData, DataError>;

    /// Serialize session data to a writer.
    fn export_to_writer(
        &self,
        data: &SessionData,
        writer: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<ExportResult, DataError>;

    /// Import session data from the file at `path`.
    fn import(&self, path: &Path, options: &ImportOptions) -> Result<SessionData, DataError> {
        log::info!("Importing {} from {:?}", self.display_name(), path);
        let mut reader = BufReader::new(File::open(path)?);
        let data = self.import_from_reader(&mut reader, options)?;
        log::info!(
            "Imported {} pH samples, {} impedance rows, {} labels",
            data.dataset.ph.len(),
            data.dataset.impedance.len(),
            data.labels.len()
        );
        Ok(data)
    }

    /// Export session data to the file at `path`.
    fn export(
        &self,
        data: &SessionData,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, DataError> {
        if !self.supports_export() {
            return Err(DataError::UnsupportedOperation(format!(
                "{} cannot be written",
                self.display_name()
            )));
        }

        log::info!("Exporting {} to {:?}", self.display_name(), path);
        let mut writer = BufWriter::new(File::create(path)?);
        let mut result = self.export_to_writer(data, &mut writer, options)?;
        writer.flush()?;
        result.files_created = vec![path.to_path_buf()];

        log::info!(
            "Exported {} rows with {} labels",
            result.rows_written,
            result.labels_exported
        );
        Ok(result)
    }

    /// Serialize session data into memory.
    fn export_to_bytes(
        &self,
        data: &SessionData,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), DataError> {
        let mut bytes = Vec::new();
        let result = self.export_to_writer(data, &mut bytes, options)?;
        Ok((bytes, result))
    }
}

/// Options for import operations.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Impedance clipping ceiling applied to raw imports.
    pub impedance_ceiling: f64,

    /// Impedance rows gathered per chunk while reading raw exports.
    pub chunk_rows: usize,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the impedance clipping ceiling.
    pub fn impedance_ceiling(mut self, ceiling: f64) -> Self {
        self.impedance_ceiling = ceiling;
        self
    }

    /// Set the impedance chunk size (at least one row).
    pub fn chunk_rows(mut self, rows: usize) -> Self {
        self.chunk_rows = rows.max(1);
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            impedance_ceiling: DEFAULT_IMPEDANCE_CEILING,
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }
}

/// Options for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Pretty-print structured formats.
    pub pretty: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of data rows (or samples) written.
    pub rows_written: usize,

    /// Number of labels written.
    pub labels_exported: usize,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}
