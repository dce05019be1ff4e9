//! Time Series Scribe - windowed navigation and interval labeling for
//! multi-channel reflux recordings.
//!
//! A recording holds one pH channel and six impedance leads. This crate loads
//! recordings (raw recorder exports, processed tables, native sessions),
//! keeps a clamped view window over them, lets a presentation layer attach
//! categorized time intervals with click gestures, and saves the result.
//!
//! The entry point for interactive use is [`Session`]; the [`format`] module
//! can be used on its own for batch conversion.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod format;
pub mod frame;
pub mod model;
pub mod search;
pub mod session;
pub mod undo;
pub mod window;

pub use config::{AppConfig, ConfigError, LogLevel};
pub use format::{DataError, FormatRegistry, SessionData, SessionFormat};
pub use frame::Frame;
pub use model::{
    Category, CategoryRegistry, ChannelId, ClickEvent, ClickOutcome, Dataset, LabelInterval,
    LabelSet,
};
pub use search::SearchMode;
pub use session::Session;
pub use window::{Shift, ViewWindow};
