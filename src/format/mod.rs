//! Recording import/export system.
//!
//! Formats implement the [`SessionFormat`] trait and are looked up through the
//! [`FormatRegistry`], by id or by file name.
//!
//! ## Supported Formats
//!
//! - **Raw export (TXT)**: the recorder's tab-delimited text export, import only
//! - **Processed CSV**: clipped channels side by side plus label columns
//! - **Scribe JSON**: native session format with full fidelity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ts_scribe::format::{FormatRegistry, ExportOptions, ImportOptions};
//!
//! let registry = FormatRegistry::new();
//! let raw = registry.get("raw").unwrap();
//! let data = raw.import(path, &ImportOptions::default())?;
//!
//! let csv = registry.get("csv").unwrap();
//! csv.export(&data, out_path, &ExportOptions::default())?;
//! ```

mod document;
mod error;
pub mod formats;
mod registry;
mod traits;

pub use document::{ChannelEntry, DocumentMetadata, LabelEntry, SessionData, SessionDocument};
pub use error::DataError;
pub use registry::{FormatRegistry, NATIVE_FORMAT_ID};
pub use traits::{ExportOptions, ExportResult, ImportOptions, SessionFormat};
