//! Recording format implementations.

pub(crate) mod common;
mod processed_csv;
mod raw;
mod scribe_json;

#[cfg(test)]
mod tests;

pub use processed_csv::ProcessedCsvFormat;
pub use raw::RawExportFormat;
pub use scribe_json::ScribeJsonFormat;
