//! Format registry for discovering and accessing recording formats.

use std::collections::HashMap;
use std::path::Path;

use crate::format::formats::{ProcessedCsvFormat, RawExportFormat, ScribeJsonFormat};
use crate::format::traits::SessionFormat;

/// Id of the native session format.
pub const NATIVE_FORMAT_ID: &str = "scribe";

/// Registry of available recording formats.
///
/// All built-in formats are registered on creation.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn SessionFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(RawExportFormat));
        registry.register(Box::new(ProcessedCsvFormat));
        registry.register(Box::new(ScribeJsonFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn SessionFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn SessionFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Pick the format for a file name.
    ///
    /// The longest matching extension wins, so `a.scribe.json` resolves to the
    /// native format rather than a generic JSON reader.
    pub fn for_path(&self, path: &Path) -> Option<&dyn SessionFormat> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        self.formats
            .values()
            .filter_map(|f| {
                f.extensions()
                    .iter()
                    .filter(|ext| name.ends_with(&format!(".{}", ext)))
                    .map(|ext| ext.len())
                    .max()
                    .map(|len| (len, f.as_ref()))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, f)| f)
    }

    /// Get all registered formats.
    pub fn all(&self) -> Vec<&dyn SessionFormat> {
        self.formats.values().map(|f| f.as_ref()).collect()
    }

    /// Get all format IDs.
    pub fn ids(&self) -> Vec<&'static str> {
        self.formats.keys().copied().collect()
    }

    /// Get the native session format.
    pub fn native(&self) -> Option<&dyn SessionFormat> {
        self.get(NATIVE_FORMAT_ID)
    }

    /// Get formats that can be written.
    pub fn export_formats(&self) -> Vec<&dyn SessionFormat> {
        self.all()
            .into_iter()
            .filter(|f| f.supports_export())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::new();

        assert!(registry.get("raw").is_some());
        assert!(registry.get("csv").is_some());
        assert!(registry.get("scribe").is_some());
        assert_eq!(registry.ids().len(), 3);
    }

    #[test]
    fn test_native_format() {
        let registry = FormatRegistry::new();
        let native = registry.native().unwrap();

        assert_eq!(native.id(), "scribe");
        assert!(native.supports_labels());
    }

    #[test]
    fn test_for_path() {
        let registry = FormatRegistry::new();
        let id = |p: &str| registry.for_path(Path::new(p)).map(|f| f.id());

        assert_eq!(id("recording.txt"), Some("raw"));
        assert_eq!(id("/tmp/Processed.CSV"), Some("csv"));
        assert_eq!(id("session.scribe.json"), Some("scribe"));
        assert_eq!(id("session.json"), Some("scribe"));
        assert_eq!(id("image.png"), None);
        assert_eq!(id("csv"), None);
    }

    #[test]
    fn test_export_formats() {
        let registry = FormatRegistry::new();
        let export = registry.export_formats();

        assert!(export.iter().any(|f| f.id() == "csv"));
        assert!(export.iter().any(|f| f.id() == "scribe"));
        assert!(!export.iter().any(|f| f.id() == "raw"));
    }
}
