//! Data models for the labeling core.

mod category;
mod interaction;
mod label;
mod signal;

pub use category::{Category, CategoryRegistry, DEFAULT_CATEGORY_NAMES, default_categories};
pub use interaction::{ClickEvent, ClickOutcome, InteractionState};
pub use label::{LabelInterval, LabelSet};
pub use signal::{Channel, ChannelId, ChannelSlice, Dataset, ImpedanceBlock};
