//! Undo/Redo system for label operations.
//!
//! Each labeling gesture that changes the [`LabelSet`] is recorded as a
//! [`Command`] carrying enough information to reverse it. Imports replace the
//! label set wholesale and clear the history.

use crate::model::{LabelInterval, LabelSet};

// ============================================================================
// Command Types
// ============================================================================

/// A command that can be undone and redone.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A label was appended at `index`.
    AddLabel {
        index: usize,
        label: LabelInterval,
    },
    /// Labels were removed by a point click; indices are the former
    /// positions, ascending.
    RemoveLabels {
        time: f64,
        removed: Vec<(usize, LabelInterval)>,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::AddLabel { label, .. } => format!("Add '{}' label", label.category),
            Command::RemoveLabels { removed, .. } => {
                format!("Remove {} label(s)", removed.len())
            }
        }
    }

    /// Reverse this command's effect.
    fn undo(&self, labels: &mut LabelSet) {
        match self {
            Command::AddLabel { index, .. } => {
                labels.remove_index(*index);
            }
            Command::RemoveLabels { removed, .. } => labels.restore(removed),
        }
    }

    /// Re-apply this command's effect.
    fn redo(&self, labels: &mut LabelSet) {
        match self {
            Command::AddLabel { index, label } => {
                labels.restore(&[(*index, label.clone())]);
            }
            Command::RemoveLabels { time, .. } => {
                labels.remove_at(*time);
            }
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// The undo/redo history stack.
///
/// When a new command is recorded, the redo stack is cleared.
/// Undo moves a command from `undo_stack` to `redo_stack`, redo moves it back.
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    undo_stack: Vec<Command>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Command>,
    /// Maximum number of commands to keep in history
    max_history: usize,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
        }
    }

    /// Record a command whose effect has already been applied.
    pub fn push(&mut self, command: Command) {
        log::debug!("Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_history {
            let excess = self.undo_stack.len() - self.max_history;
            self.undo_stack.drain(..excess);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Undo the latest command. Returns false if there was nothing to undo.
    pub fn undo(&mut self, labels: &mut LabelSet) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("Undo: '{}'", cmd.description());
        cmd.undo(labels);
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the latest undone command. Returns false if there was nothing to redo.
    pub fn redo(&mut self, labels: &mut LabelSet) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("Redo: '{}'", cmd.description());
        cmd.redo(labels);
        self.undo_stack.push(cmd);
        true
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("Undo history cleared");
    }

    /// Get the number of commands in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_UNDO_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(category: &str, a: f64, b: f64) -> LabelInterval {
        LabelInterval::new(category, a, b, [1, 2, 3])
    }

    #[test]
    fn test_undo_redo_add() {
        let mut labels = LabelSet::new();
        let mut stack = UndoStack::default();

        let added = label("Meal", 0.0, 10.0);
        let index = labels.add(added.clone());
        stack.push(Command::AddLabel {
            index,
            label: added,
        });
        assert_eq!(stack.undo_description().as_deref(), Some("Add 'Meal' label"));

        assert!(stack.undo(&mut labels));
        assert!(labels.is_empty());
        assert!(stack.can_redo());

        assert!(stack.redo(&mut labels));
        assert_eq!(labels.len(), 1);
        assert!(!stack.redo(&mut labels));
    }

    #[test]
    fn test_undo_removal_restores_positions() {
        let original = LabelSet::from_intervals(vec![
            label("Reflux", 0.0, 10.0),
            label("Meal", 100.0, 200.0),
            label("Swallow", 5.0, 15.0),
        ]);
        let mut labels = original.clone();
        let mut stack = UndoStack::default();

        let removed = labels.take_at(7.0);
        stack.push(Command::RemoveLabels { time: 7.0, removed });
        assert_eq!(labels.len(), 1);

        stack.undo(&mut labels);
        assert_eq!(labels, original);

        stack.redo(&mut labels);
        assert_eq!(labels.as_slice()[0].category, "Meal");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut labels = LabelSet::new();
        let mut stack = UndoStack::new(2);
        for i in 0..5 {
            let l = label("Meal", i as f64, i as f64 + 1.0);
            let index = labels.add(l.clone());
            stack.push(Command::AddLabel { index, label: l });
        }
        assert_eq!(stack.undo_count(), 2);
        stack.clear();
        assert!(!stack.can_undo());
        assert!(!stack.undo(&mut labels));
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut labels = LabelSet::new();
        let mut stack = UndoStack::default();
        let l = label("Meal", 0.0, 1.0);
        let index = labels.add(l.clone());
        stack.push(Command::AddLabel { index, label: l.clone() });
        stack.undo(&mut labels);
        assert_eq!(stack.redo_count(), 1);

        let index = labels.add(l.clone());
        stack.push(Command::AddLabel { index, label: l });
        assert_eq!(stack.redo_count(), 0);
    }
}
