//! Session data structures for import/export.
//!
//! [`SessionData`] is what every format converts to and from: one dataset and
//! its labels. [`SessionDocument`] is the serde representation written by the
//! native JSON format.
//!
//! # Versioning
//!
//! The native format uses semantic versioning (MAJOR.MINOR.PATCH). Version
//! 0.x.x files are unstable: only files with the same minor version are
//! considered compatible, other 0.x files are read with a warning.

use serde::{Deserialize, Serialize};

use crate::constants::IMPEDANCE_CHANNELS;
use crate::format::error::DataError;
use crate::model::{Channel, Dataset, ImpedanceBlock, LabelInterval, LabelSet};

/// One loaded recording together with its labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    pub dataset: Dataset,
    pub labels: LabelSet,
}

impl SessionData {
    pub fn new(dataset: Dataset, labels: LabelSet) -> Self {
        Self { dataset, labels }
    }

    /// Reject datasets with an empty channel.
    pub fn validate(&self) -> Result<(), DataError> {
        match self.dataset.first_empty_channel() {
            Some(channel) => Err(DataError::EmptyData { channel }),
            None => Ok(()),
        }
    }
}

/// Full-fidelity serialized session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Format version for compatibility checking.
    pub version: String,

    /// Ceiling that was applied to impedance values.
    pub impedance_ceiling: f64,

    /// Reference pH channel.
    pub ph: ChannelEntry,

    /// Shared impedance time axis in milliseconds.
    pub impedance_time: Vec<i64>,

    /// Impedance value columns, one per lead.
    pub impedance: Vec<Vec<f64>>,

    /// Labels in creation order.
    #[serde(default)]
    pub labels: Vec<LabelEntry>,

    /// Document metadata (creation date, tool version).
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl SessionDocument {
    /// Current version of the document format.
    pub const CURRENT_VERSION: &'static str = "0.1.0";

    /// Major version number for compatibility checking.
    pub const VERSION_MAJOR: u32 = 0;

    /// Minor version number.
    pub const VERSION_MINOR: u32 = 1;

    /// Build a document from in-memory session data.
    pub fn from_session(data: &SessionData) -> Self {
        let dataset = &data.dataset;
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            impedance_ceiling: dataset.impedance_ceiling,
            ph: ChannelEntry {
                time: dataset.ph.time.clone(),
                values: dataset.ph.values.clone(),
            },
            impedance_time: dataset.impedance.time.clone(),
            impedance: dataset.impedance.leads.to_vec(),
            labels: data.labels.iter().map(LabelEntry::from_label).collect(),
            metadata: DocumentMetadata::new(),
        }
    }

    /// Convert back to session data, checking column shapes.
    pub fn into_session(self) -> Result<SessionData, DataError> {
        if self.ph.time.len() != self.ph.values.len() {
            return Err(DataError::format(format!(
                "pH has {} times but {} values",
                self.ph.time.len(),
                self.ph.values.len()
            )));
        }

        let leads: [Vec<f64>; IMPEDANCE_CHANNELS] =
            self.impedance.try_into().map_err(|cols: Vec<Vec<f64>>| {
                DataError::format(format!(
                    "expected {} impedance columns, found {}",
                    IMPEDANCE_CHANNELS,
                    cols.len()
                ))
            })?;
        if let Some((idx, lead)) = leads
            .iter()
            .enumerate()
            .find(|(_, lead)| lead.len() != self.impedance_time.len())
        {
            return Err(DataError::format(format!(
                "impedance column {} has {} values for {} times",
                idx + 1,
                lead.len(),
                self.impedance_time.len()
            )));
        }

        let labels = self
            .labels
            .into_iter()
            .map(LabelEntry::into_label)
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Dataset::new(
            Channel::new(self.ph.time, self.ph.values),
            ImpedanceBlock {
                time: self.impedance_time,
                leads,
            },
            self.impedance_ceiling,
        );
        Ok(SessionData::new(dataset, LabelSet::from_intervals(labels)))
    }

    /// Parse a version string into (major, minor, patch) components.
    ///
    /// Returns None if the version string is invalid.
    pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return None;
        }
        let major = parts[0].parse().ok()?;
        let minor = parts[1].parse().ok()?;
        let patch = parts[2].parse().ok()?;
        Some((major, minor, patch))
    }

    /// Check if a version is compatible with the current version.
    pub fn is_version_compatible(file_version: &str) -> bool {
        let Some((file_major, file_minor, _)) = Self::parse_version(file_version) else {
            return false;
        };

        if Self::VERSION_MAJOR == 0 {
            file_major == 0 && file_minor == Self::VERSION_MINOR
        } else {
            file_major == Self::VERSION_MAJOR
        }
    }

    /// Check if we can attempt to read a file at all.
    pub fn is_version_readable(file_version: &str) -> bool {
        let Some((file_major, _, _)) = Self::parse_version(file_version) else {
            return false;
        };
        file_major == Self::VERSION_MAJOR
    }
}

/// Serialized channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub time: Vec<i64>,
    pub values: Vec<f64>,
}

/// Serialized label with a structured `[start, end]` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Category name.
    pub category: String,

    /// Interval endpoints.
    pub interval: [f64; 2],

    /// Color as `#rrggbb`.
    pub color: String,
}

impl LabelEntry {
    /// Create from an internal label.
    pub fn from_label(label: &LabelInterval) -> Self {
        Self {
            category: label.category.clone(),
            interval: [label.start, label.end],
            color: crate::color_utils::to_hex(label.color),
        }
    }

    /// Convert to an internal label.
    pub fn into_label(self) -> Result<LabelInterval, DataError> {
        let color = crate::color_utils::parse_hex(&self.color)
            .ok_or_else(|| DataError::format(format!("invalid label color '{}'", self.color)))?;
        let [a, b] = self.interval;
        if !a.is_finite() || !b.is_finite() {
            return Err(DataError::label_parse(format!("[{:?}, {:?}]", a, b)));
        }
        Ok(LabelInterval::new(self.category, a, b, color))
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Tool that created this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Creation timestamp (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl DocumentMetadata {
    /// Create new metadata with the current timestamp.
    pub fn new() -> Self {
        Self {
            created_by: Some(format!("ts_scribe {}", env!("CARGO_PKG_VERSION"))),
            created_at: Some(Self::current_timestamp()),
        }
    }

    /// Get the current timestamp as ISO 8601 string (UTC).
    fn current_timestamp() -> String {
        let now = web_time::SystemTime::now();
        let secs = now
            .duration_since(web_time::SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let (year, month, day) = days_to_ymd(secs / 86_400);
        let secs_today = secs % 86_400;
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            year,
            month,
            day,
            secs_today / 3600,
            (secs_today % 3600) / 60,
            secs_today % 60
        )
    }
}

/// Convert days since Unix epoch to year/month/day.
fn days_to_ymd(days: u64) -> (u32, u32, u32) {
    let mut remaining_days = days as i64;
    let mut year = 1970i32;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let feb = if is_leap_year(year) { 29 } else { 28 };
    let days_in_months: [i64; 12] = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut month = 1u32;
    for &days_in_month in &days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year as u32, month, remaining_days as u32 + 1)
}

/// Check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
