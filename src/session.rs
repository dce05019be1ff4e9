//! Top-level session state.
//!
//! A [`Session`] owns the loaded recording and everything that changes while
//! a user works on it: the visible window, the pending labeling gesture, the
//! undo history and the category colors. Presentation layers call its
//! operations and read a fresh [`Frame`] afterwards.
//!
//! Loads are all-or-nothing. A file is parsed completely before anything is
//! replaced; when parsing fails the previous recording stays as it was.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::constants::{MAX_WINDOW_MINUTES, MIN_WINDOW_MINUTES, WINDOW_STEP_MINUTES};
use crate::format::{
    DataError, ExportOptions, ExportResult, FormatRegistry, SessionData, SessionFormat,
};
use crate::frame::Frame;
use crate::model::{
    CategoryRegistry, ClickEvent, ClickOutcome, Dataset, InteractionState, LabelSet,
};
use crate::undo::{Command, UndoStack};
use crate::window::{Shift, ViewWindow, minutes_to_ms};

/// A recording that is currently open.
#[derive(Debug, Clone)]
struct Loaded {
    data: SessionData,
    window: ViewWindow,
    source: Option<PathBuf>,
}

/// Loaded data plus transient view and interaction state.
pub struct Session {
    config: AppConfig,
    formats: FormatRegistry,
    categories: CategoryRegistry,
    loaded: Option<Loaded>,
    interaction: InteractionState,
    undo: UndoStack,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let categories = config.category_registry();
        let undo = UndoStack::new(config.preferences.undo_history);
        Self {
            config,
            formats: FormatRegistry::new(),
            categories,
            loaded: None,
            interaction: InteractionState::Idle,
            undo,
        }
    }

    // ------------------------------------------------------------------
    // Loading and saving
    // ------------------------------------------------------------------

    /// Load a raw recorder export (clipped at ingestion).
    pub fn import_raw(&mut self, path: &Path) -> Result<(), DataError> {
        self.load_with_id("raw", path)
    }

    /// Load a processed table with its labels.
    pub fn load_processed(&mut self, path: &Path) -> Result<(), DataError> {
        self.load_with_id("csv", path)
    }

    /// Load any supported file, choosing the format by file name.
    pub fn load_file(&mut self, path: &Path) -> Result<(), DataError> {
        let format = self.format_for(path)?;
        let data = format.import(path, &self.config.preferences.import_options())?;
        self.install(data, Some(path.to_path_buf()))
    }

    /// Load from an already open stream in the format with id `format_id`.
    pub fn load_reader(
        &mut self,
        format_id: &str,
        reader: &mut dyn BufRead,
    ) -> Result<(), DataError> {
        let format = self.format_by_id(format_id)?;
        let data = format.import_from_reader(reader, &self.config.preferences.import_options())?;
        self.install(data, None)
    }

    /// Write the current recording and labels, choosing the format by file
    /// name.
    pub fn export(&self, path: &Path) -> Result<ExportResult, DataError> {
        let loaded = self.loaded()?;
        let format = self.format_for(path)?;
        format.export(&loaded.data, path, &self.export_options())
    }

    /// Write the current recording in the format with id `format_id`.
    pub fn export_as(&self, format_id: &str, path: &Path) -> Result<ExportResult, DataError> {
        let loaded = self.loaded()?;
        let format = self.format_by_id(format_id)?;
        format.export(&loaded.data, path, &self.export_options())
    }

    /// Advance to the next recording in a batch.
    ///
    /// Batches are not supported yet; this only logs the request.
    pub fn next_signal(&mut self) -> Option<PathBuf> {
        log::info!("Next signal requested; batch navigation is not available");
        None
    }

    fn load_with_id(&mut self, format_id: &str, path: &Path) -> Result<(), DataError> {
        let format = self.format_by_id(format_id)?;
        let data = format.import(path, &self.config.preferences.import_options())?;
        self.install(data, Some(path.to_path_buf()))
    }

    fn format_by_id(&self, id: &str) -> Result<&dyn SessionFormat, DataError> {
        self.formats
            .get(id)
            .ok_or_else(|| DataError::UnsupportedOperation(format!("unknown format '{}'", id)))
    }

    fn format_for(&self, path: &Path) -> Result<&dyn SessionFormat, DataError> {
        self.formats.for_path(path).ok_or_else(|| {
            DataError::UnsupportedOperation(format!("no format handles {:?}", path))
        })
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions::new().pretty(self.config.preferences.pretty_json)
    }

    fn loaded(&self) -> Result<&Loaded, DataError> {
        self.loaded
            .as_ref()
            .ok_or_else(|| DataError::UnsupportedOperation("no recording loaded".to_string()))
    }

    /// Swap in freshly parsed data and reset per-load state.
    fn install(
        &mut self,
        mut data: SessionData,
        source: Option<PathBuf>,
    ) -> Result<(), DataError> {
        data.validate()?;
        let (Some(min_time), Some(max_time)) = (data.dataset.min_time(), data.dataset.max_time())
        else {
            return Err(DataError::format("recording has no time range"));
        };

        let mut recolored = 0usize;
        for label in data.labels.iter_mut() {
            let color = self.categories.adopt(&label.category, label.color).color;
            if label.color != color {
                label.color = color;
                recolored += 1;
            }
        }
        if recolored > 0 {
            log::warn!("Recolored {} loaded labels to their category color", recolored);
        }
        let width = minutes_to_ms(self.config.preferences.default_window_minutes);
        let window = ViewWindow::new(min_time, max_time, width);
        log::info!(
            "Loaded recording {}..{} ms with {} labels, window {} ms",
            min_time,
            max_time,
            data.labels.len(),
            window.width()
        );

        self.loaded = Some(Loaded {
            data,
            window,
            source,
        });
        self.undo.clear();
        self.interaction = InteractionState::Idle;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Snapshot of the current window, if a recording is loaded.
    pub fn frame(&self) -> Option<Frame<'_>> {
        let loaded = self.loaded.as_ref()?;
        Some(Frame::build(
            &loaded.data.dataset,
            &loaded.data.labels,
            &loaded.window,
            self.config.preferences.search_mode,
        ))
    }

    // ------------------------------------------------------------------
    // Labeling
    // ------------------------------------------------------------------

    /// Start capturing an interval for `category`.
    ///
    /// Unknown categories are created with the next palette color. Returns
    /// false when nothing is loaded or another gesture is pending.
    pub fn begin_capture(&mut self, category: &str) -> bool {
        if self.loaded.is_none() || self.interaction.controls_locked() {
            return false;
        }
        let category = category.trim();
        if category.is_empty() {
            log::warn!("Ignoring capture request without a category name");
            return false;
        }
        let color = self.categories.resolve(category).color;
        self.interaction.begin_capture(category, color)
    }

    /// Wait for a click whose labels should be removed.
    pub fn begin_removal(&mut self) -> bool {
        if self.loaded.is_none() {
            return false;
        }
        self.interaction.begin_removal()
    }

    /// Abandon the pending gesture.
    pub fn cancel_interaction(&mut self) -> bool {
        self.interaction.cancel()
    }

    /// Route a plot click to the pending gesture and record the edit.
    pub fn click(&mut self, event: ClickEvent) -> ClickOutcome {
        let Some(loaded) = self.loaded.as_mut() else {
            return ClickOutcome::Ignored;
        };
        let labels = &mut loaded.data.labels;
        let outcome = self.interaction.click(event, labels);

        match &outcome {
            ClickOutcome::Committed(label) => self.undo.push(Command::AddLabel {
                index: labels.len() - 1,
                label: label.clone(),
            }),
            ClickOutcome::Removed(removed) if !removed.is_empty() => {
                self.undo.push(Command::RemoveLabels {
                    time: event.time,
                    removed: removed.clone(),
                })
            }
            _ => {}
        }
        outcome
    }

    /// Undo the latest label edit. Ignored while a gesture is pending.
    pub fn undo(&mut self) -> bool {
        if self.interaction.controls_locked() {
            return false;
        }
        match self.loaded.as_mut() {
            Some(loaded) => self.undo.undo(&mut loaded.data.labels),
            None => false,
        }
    }

    /// Redo the latest undone label edit. Ignored while a gesture is pending.
    pub fn redo(&mut self) -> bool {
        if self.interaction.controls_locked() {
            return false;
        }
        match self.loaded.as_mut() {
            Some(loaded) => self.undo.redo(&mut loaded.data.labels),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Apply one of the navigation moves.
    pub fn shift(&mut self, shift: Shift) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.window.apply(shift);
        }
    }

    /// Change the zoom, snapped to the control step and clamped to its range.
    pub fn set_width_minutes(&mut self, minutes: f64) {
        if !minutes.is_finite() {
            return;
        }
        let snapped = (minutes / WINDOW_STEP_MINUTES).round() * WINDOW_STEP_MINUTES;
        if let Some(loaded) = self.loaded.as_mut() {
            loaded
                .window
                .set_width_minutes(snapped.clamp(MIN_WINDOW_MINUTES, MAX_WINDOW_MINUTES));
        }
    }

    /// Move the left edge of the window to `time` (milliseconds).
    pub fn jump_to(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.window.jump_to(time.round() as i64);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.loaded.as_ref().map(|l| &l.data.dataset)
    }

    pub fn labels(&self) -> Option<&LabelSet> {
        self.loaded.as_ref().map(|l| &l.data.labels)
    }

    pub fn window(&self) -> Option<&ViewWindow> {
        self.loaded.as_ref().map(|l| &l.window)
    }

    /// Path the current recording was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.loaded.as_ref().and_then(|l| l.source.as_deref())
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
