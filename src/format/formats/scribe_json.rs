//! Native session JSON format.
//!
//! Stores the clipped dataset and every label with structured `[start, end]`
//! pairs, so a saved session reloads exactly as it was written.
//!
//! # Versioning
//!
//! The format is versioned like the rest of the tool (see [`SessionDocument`]):
//! a different major version is refused, a different 0.x minor is read with a
//! warning.

use std::io::{BufRead, Write};

use crate::format::document::{SessionData, SessionDocument};
use crate::format::error::DataError;
use crate::format::formats::common::check_sorted;
use crate::format::traits::{ExportOptions, ExportResult, ImportOptions, SessionFormat};
use crate::model::ChannelId;

/// Native session format with full fidelity.
pub struct ScribeJsonFormat;

impl SessionFormat for ScribeJsonFormat {
    fn id(&self) -> &'static str {
        "scribe"
    }

    fn display_name(&self) -> &'static str {
        "Scribe session (JSON)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["scribe.json", "json"]
    }

    fn supports_export(&self) -> bool {
        true
    }

    fn supports_labels(&self) -> bool {
        true
    }

    fn import_from_reader(
        &self,
        reader: &mut dyn BufRead,
        _options: &ImportOptions,
    ) -> Result<SessionData, DataError> {
        let doc: SessionDocument = serde_json::from_reader(reader)?;

        if !SessionDocument::is_version_readable(&doc.version) {
            return Err(DataError::VersionMismatch {
                expected: SessionDocument::CURRENT_VERSION.to_string(),
                found: doc.version,
            });
        }
        if !SessionDocument::is_version_compatible(&doc.version) {
            log::warn!(
                "Session version {} may not be fully compatible with current version {}",
                doc.version,
                SessionDocument::CURRENT_VERSION
            );
        }
        if let Some(created_by) = &doc.metadata.created_by {
            log::debug!("Session written by {}", created_by);
        }

        let data = doc.into_session()?;
        data.validate()?;
        check_sorted(ChannelId::Ph, &data.dataset.ph.time)?;
        check_sorted(ChannelId::Impedance(1), &data.dataset.impedance.time)?;
        Ok(data)
    }

    fn export_to_writer(
        &self,
        data: &SessionData,
        writer: &mut dyn Write,
        options: &ExportOptions,
    ) -> Result<ExportResult, DataError> {
        let doc = SessionDocument::from_session(data);
        if options.pretty {
            serde_json::to_writer_pretty(&mut *writer, &doc)?;
        } else {
            serde_json::to_writer(&mut *writer, &doc)?;
        }

        Ok(ExportResult {
            rows_written: data.dataset.ph.len() + data.dataset.impedance.len(),
            labels_exported: data.labels.len(),
            files_created: Vec::new(),
        })
    }
}
