//! Visible window navigation.
//!
//! The window is a left edge plus a width over the recording's time axis.
//! Every mutation re-clamps the left edge into `[min_time, max_time - width]`;
//! out-of-range requests are pinned to the nearest edge, never rejected.

use crate::constants::MS_PER_MINUTE;

/// The four canonical navigation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// One full width to the left.
    PageLeft,
    /// A tenth of the width to the left.
    NudgeLeft,
    /// A tenth of the width to the right.
    NudgeRight,
    /// One full width to the right.
    PageRight,
}

/// Direction of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Shift {
    /// Fraction of the width and the direction of this move.
    pub fn parts(self) -> (f64, Direction) {
        match self {
            Shift::PageLeft => (1.0, Direction::Left),
            Shift::NudgeLeft => (0.1, Direction::Left),
            Shift::NudgeRight => (0.1, Direction::Right),
            Shift::PageRight => (1.0, Direction::Right),
        }
    }
}

/// Current view over the recording, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    left: i64,
    width: i64,
    min_time: i64,
    max_time: i64,
}

impl ViewWindow {
    /// Window of `width` starting at `min_time`, already clamped.
    ///
    /// When `width` exceeds the data span the left edge lands at
    /// `max_time - width`, which can be below `min_time`.
    pub fn new(min_time: i64, max_time: i64, width: i64) -> Self {
        let mut window = Self {
            left: min_time,
            width: width.max(1),
            min_time,
            max_time,
        };
        window.clamp();
        window
    }

    pub fn left(&self) -> i64 {
        self.left
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    /// Right edge (exclusive).
    pub fn right_time(&self) -> i64 {
        self.left + self.width
    }

    pub fn min_time(&self) -> i64 {
        self.min_time
    }

    pub fn max_time(&self) -> i64 {
        self.max_time
    }

    /// `(left, right)` pair used for range queries.
    pub fn range(&self) -> (i64, i64) {
        (self.left, self.right_time())
    }

    /// Whether `time` is inside the visible window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.left as f64 && time < self.right_time() as f64
    }

    /// Move the window by a fraction of its width.
    pub fn shift(&mut self, fraction: f64, direction: Direction) {
        let amount = (self.width as f64 * fraction.abs()).round() as i64;
        match direction {
            Direction::Left => self.left = self.left.saturating_sub(amount),
            Direction::Right => {
                // A move that starts past the end is dropped, then re-pinned.
                if self.left.saturating_add(amount) <= self.max_time {
                    self.left = self.left.saturating_add(amount);
                }
            }
        }
        self.clamp();
    }

    /// Apply one of the canonical moves.
    pub fn apply(&mut self, shift: Shift) {
        let (fraction, direction) = shift.parts();
        self.shift(fraction, direction);
    }

    /// Change the width in milliseconds (at least 1 ms).
    pub fn set_width(&mut self, width: i64) {
        self.width = width.max(1);
        self.clamp();
    }

    /// Change the width from a zoom control value in minutes.
    pub fn set_width_minutes(&mut self, minutes: f64) {
        self.set_width(minutes_to_ms(minutes));
    }

    /// Width expressed in minutes.
    pub fn width_minutes(&self) -> f64 {
        self.width as f64 / MS_PER_MINUTE
    }

    /// Put the left edge at `time`.
    pub fn jump_to(&mut self, time: i64) {
        self.left = time;
        self.clamp();
    }

    /// Pull the left edge back inside the data bounds.
    fn clamp(&mut self) {
        if self.left < self.min_time {
            self.left = self.min_time;
        }
        if self.left.saturating_add(self.width) >= self.max_time {
            self.left = self.max_time - self.width;
        }
    }
}

/// Convert a zoom value in minutes to whole milliseconds.
pub fn minutes_to_ms(minutes: f64) -> i64 {
    (minutes * MS_PER_MINUTE).round() as i64
}
