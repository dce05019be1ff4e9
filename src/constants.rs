//! Global constants for the Time Series Scribe core

/// Number of impedance leads in a recording.
pub const IMPEDANCE_CHANNELS: usize = 6;

/// Default clipping ceiling applied to impedance values at ingestion.
pub const DEFAULT_IMPEDANCE_CEILING: f64 = 11.0;

/// Lines between a raw section marker and its first data row.
pub const RAW_HEADER_SKIP: usize = 4;

/// Impedance rows gathered per chunk while reading a raw export.
pub const DEFAULT_CHUNK_ROWS: usize = 1_000_000;

/// Milliseconds per minute (zoom control unit).
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Zoom control range and default, in minutes.
pub const MIN_WINDOW_MINUTES: f64 = 0.5;
pub const MAX_WINDOW_MINUTES: f64 = 20.0;
pub const WINDOW_STEP_MINUTES: f64 = 0.5;
pub const DEFAULT_WINDOW_MINUTES: f64 = 2.0;

/// pH below this value is highlighted as acid exposure.
pub const ACID_PH_THRESHOLD: f64 = 4.0;

/// Evenly spaced ticks on the window axis (an end tick is appended).
pub const WINDOW_TICK_STEPS: usize = 6;

/// Evenly spaced ticks on the overview track (an end tick is appended).
pub const OVERVIEW_TICK_STEPS: usize = 8;

/// Label colors, handed out to categories in creation order.
pub const LABEL_PALETTE: [[u8; 3]; 12] = [
    [0x01, 0x73, 0xb2],
    [0xde, 0x8f, 0x05],
    [0x02, 0x9e, 0x73],
    [0xd5, 0x5e, 0x00],
    [0xcc, 0x78, 0xbc],
    [0xca, 0x91, 0x61],
    [0xfb, 0xaf, 0xe4],
    [0x94, 0x94, 0x94],
    [0xec, 0xe1, 0x33],
    [0x56, 0xb4, 0xe9],
    [0x01, 0x73, 0xb2],
    [0xde, 0x8f, 0x05],
];

/// Maximum number of undoable label commands kept in history.
pub const DEFAULT_UNDO_HISTORY: usize = 100;
