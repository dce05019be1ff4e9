//! Interaction state machine for labeling gestures.
//!
//! Exactly one gesture can be pending at a time: either a two-click capture of
//! a new interval or a one-click removal. While one is pending all labeling
//! controls are locked.

use super::label::{LabelInterval, LabelSet};

/// A click forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Time coordinate under the cursor.
    pub time: f64,
    /// Whether the click landed inside the plot's data area.
    pub in_plot: bool,
}

impl ClickEvent {
    pub fn in_plot(time: f64) -> Self {
        Self {
            time,
            in_plot: true,
        }
    }

    pub fn outside(time: f64) -> Self {
        Self {
            time,
            in_plot: false,
        }
    }
}

/// What a click did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Idle, or the click was outside the plot area.
    Ignored,
    /// First capture point recorded; one more click needed.
    Pending,
    /// Second capture point recorded; the new label was appended.
    Committed(LabelInterval),
    /// Removal resolved; carries the removed labels with their former indices.
    Removed(Vec<(usize, LabelInterval)>),
}

/// Current labeling gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No gesture pending.
    #[default]
    Idle,
    /// Waiting for interval endpoints.
    Capturing {
        category: String,
        color: [u8; 3],
        /// First endpoint once it has been clicked.
        first: Option<f64>,
    },
    /// Waiting for the point whose labels should be removed.
    Removing,
}

impl InteractionState {
    /// Whether labeling controls must be disabled.
    pub fn controls_locked(&self) -> bool {
        !matches!(self, InteractionState::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, InteractionState::Capturing { .. })
    }

    /// Clicks collected so far while capturing (0 or 1).
    pub fn clicks(&self) -> Option<usize> {
        match self {
            InteractionState::Capturing { first, .. } => Some(usize::from(first.is_some())),
            _ => None,
        }
    }

    /// Enter capture mode. Ignored unless idle.
    pub fn begin_capture(&mut self, category: impl Into<String>, color: [u8; 3]) -> bool {
        if self.controls_locked() {
            log::debug!("Capture request ignored: {:?} pending", self);
            return false;
        }
        let category = category.into();
        log::debug!("Capturing interval for '{}'", category);
        *self = InteractionState::Capturing {
            category,
            color,
            first: None,
        };
        true
    }

    /// Enter removal mode. Ignored unless idle.
    pub fn begin_removal(&mut self) -> bool {
        if self.controls_locked() {
            log::debug!("Removal request ignored: {:?} pending", self);
            return false;
        }
        log::debug!("Waiting for label removal point");
        *self = InteractionState::Removing;
        true
    }

    /// Abandon the pending gesture. Returns false if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.controls_locked();
        if was_pending {
            log::debug!("Cancelled {:?}", self);
        }
        *self = InteractionState::Idle;
        was_pending
    }

    /// Feed one capture point.
    ///
    /// Returns the committed label on the second point, None otherwise
    /// (including when not capturing).
    pub fn submit_click(&mut self, time: f64, labels: &mut LabelSet) -> Option<LabelInterval> {
        match self.click(ClickEvent::in_plot(time), labels) {
            ClickOutcome::Committed(label) => Some(label),
            _ => None,
        }
    }

    /// Route a click according to the current state.
    pub fn click(&mut self, event: ClickEvent, labels: &mut LabelSet) -> ClickOutcome {
        if !event.in_plot || event.time.is_nan() {
            return ClickOutcome::Ignored;
        }

        match self {
            InteractionState::Idle => ClickOutcome::Ignored,
            InteractionState::Capturing {
                category,
                color,
                first,
            } => match *first {
                None => {
                    *first = Some(event.time);
                    ClickOutcome::Pending
                }
                Some(start) => {
                    let label = LabelInterval::new(category.clone(), start, event.time, *color);
                    log::info!(
                        "Labeled '{}' [{}, {}]",
                        label.category,
                        label.start,
                        label.end
                    );
                    labels.add(label.clone());
                    *self = InteractionState::Idle;
                    ClickOutcome::Committed(label)
                }
            },
            InteractionState::Removing => {
                let removed = labels.take_at(event.time);
                log::info!("Removed {} label(s) at {}", removed.len(), event.time);
                *self = InteractionState::Idle;
                ClickOutcome::Removed(removed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEAL: [u8; 3] = [0xcc, 0x78, 0xbc];

    #[test]
    fn test_two_click_capture_sorts_and_commits() {
        let mut labels = LabelSet::new();
        let mut state = InteractionState::default();

        assert!(state.begin_capture("Meal", MEAL));
        assert_eq!(state.clicks(), Some(0));

        assert_eq!(state.submit_click(100.0, &mut labels), None);
        assert_eq!(state.clicks(), Some(1));
        assert!(state.is_capturing());

        let label = state.submit_click(50.0, &mut labels).expect("committed");
        assert_eq!((label.start, label.end), (50.0, 100.0));
        assert_eq!(label.category, "Meal");
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_clicks_outside_plot_do_not_count() {
        let mut labels = LabelSet::new();
        let mut state = InteractionState::default();
        state.begin_capture("Reflux", [1, 115, 178]);

        assert_eq!(
            state.click(ClickEvent::outside(10.0), &mut labels),
            ClickOutcome::Ignored
        );
        assert_eq!(state.clicks(), Some(0));
        assert_eq!(
            state.click(ClickEvent::in_plot(10.0), &mut labels),
            ClickOutcome::Pending
        );
        assert_eq!(state.clicks(), Some(1));
    }

    #[test]
    fn test_capture_not_reentrant() {
        let mut labels = LabelSet::new();
        let mut state = InteractionState::default();
        assert!(state.begin_capture("Meal", MEAL));
        state.submit_click(5.0, &mut labels);

        assert!(!state.begin_capture("Reflux", [1, 115, 178]));
        assert!(!state.begin_removal());
        // The pending capture keeps its first point
        assert_eq!(state.clicks(), Some(1));
    }

    #[test]
    fn test_removal_resolves_after_one_click() {
        let mut labels = LabelSet::from_intervals(vec![
            LabelInterval::new("Meal", 0.0, 10.0, MEAL),
            LabelInterval::new("Meal", 5.0, 15.0, MEAL),
        ]);
        let mut state = InteractionState::default();
        assert!(state.begin_removal());
        assert!(state.controls_locked());

        // Miss: still resolves and returns to idle
        match state.click(ClickEvent::in_plot(50.0), &mut labels) {
            ClickOutcome::Removed(removed) => assert!(removed.is_empty()),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(state, InteractionState::Idle);
        assert_eq!(labels.len(), 2);

        state.begin_removal();
        match state.click(ClickEvent::in_plot(7.0), &mut labels) {
            ClickOutcome::Removed(removed) => assert_eq!(removed.len(), 2),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(labels.is_empty());
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut state = InteractionState::default();
        assert!(!state.cancel());
        state.begin_capture("Meal", MEAL);
        assert!(state.cancel());
        assert!(!state.controls_locked());
        state.begin_removal();
        assert!(state.cancel());
        assert_eq!(state, InteractionState::Idle);
    }

    #[test]
    fn test_idle_click_is_ignored() {
        let mut labels = LabelSet::new();
        let mut state = InteractionState::default();
        assert_eq!(
            state.click(ClickEvent::in_plot(1.0), &mut labels),
            ClickOutcome::Ignored
        );
        assert_eq!(state.submit_click(1.0, &mut labels), None);
    }
}
