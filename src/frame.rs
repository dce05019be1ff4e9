//! Everything a presentation layer needs to draw the current window.
//!
//! A [`Frame`] borrows from the loaded dataset and label set; it is rebuilt
//! after every mutation and never cached.

use crate::constants::{ACID_PH_THRESHOLD, OVERVIEW_TICK_STEPS, WINDOW_TICK_STEPS};
use crate::model::{ChannelId, ChannelSlice, Dataset, LabelInterval, LabelSet};
use crate::search::{SearchMode, bisect_range};
use crate::window::ViewWindow;

/// Visible samples of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelTrace<'a> {
    pub id: ChannelId,
    /// Index range into the full channel.
    pub range: (usize, usize),
    pub samples: ChannelSlice<'a>,
}

/// Axis tick at a time, with its clock label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub time: i64,
    pub label: String,
}

/// Contiguous run of pH samples below the acid threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcidSpan {
    pub start: i64,
    pub end: i64,
}

/// Render snapshot for one window position.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub left: i64,
    pub right: i64,
    /// Bounds of the whole recording, for the overview track.
    pub min_time: i64,
    pub max_time: i64,
    pub impedance_ceiling: f64,
    /// pH first, then Z1..Z6.
    pub channels: Vec<ChannelTrace<'a>>,
    /// Labels touching the window, in creation order.
    pub labels: Vec<&'a LabelInterval>,
    pub window_ticks: Vec<Tick>,
    pub overview_ticks: Vec<Tick>,
    pub acid_spans: Vec<AcidSpan>,
}

impl<'a> Frame<'a> {
    /// Build the frame for `window` over a loaded dataset.
    pub fn build(
        dataset: &'a Dataset,
        labels: &'a LabelSet,
        window: &ViewWindow,
        mode: SearchMode,
    ) -> Self {
        let (left, right) = window.range();

        let channels: Vec<ChannelTrace<'a>> = dataset
            .channels()
            .map(|(id, slice)| {
                let range = bisect_range(slice.time, left, right, mode);
                ChannelTrace {
                    id,
                    range,
                    samples: slice.range(range.0, range.1),
                }
            })
            .collect();

        let acid_spans = channels
            .iter()
            .find(|trace| trace.id == ChannelId::Ph)
            .map(|trace| acid_spans(trace.samples, ACID_PH_THRESHOLD, left, right))
            .unwrap_or_default();

        Self {
            left,
            right,
            min_time: window.min_time(),
            max_time: window.max_time(),
            impedance_ceiling: dataset.impedance_ceiling,
            channels,
            labels: labels.overlapping(left as f64, right as f64).collect(),
            window_ticks: ticks(left, right, WINDOW_TICK_STEPS),
            overview_ticks: ticks(window.min_time(), window.max_time(), OVERVIEW_TICK_STEPS),
            acid_spans,
        }
    }

    /// Visible samples of one channel.
    pub fn channel(&self, id: ChannelId) -> Option<&ChannelTrace<'a>> {
        self.channels.iter().find(|trace| trace.id == id)
    }
}

/// `steps` evenly spaced ticks from `from`, plus a final tick at `to`.
pub fn ticks(from: i64, to: i64, steps: usize) -> Vec<Tick> {
    let steps = steps.max(1) as i64;
    let span = to - from;
    (0..steps)
        .map(|k| from + span * k / steps)
        .chain(std::iter::once(to))
        .map(|time| Tick {
            time,
            label: format_clock(time),
        })
        .collect()
}

/// Format milliseconds as `HH:MM:SS`, hours wrapping at 24.
pub fn format_clock(ms: i64) -> String {
    let secs = ms.div_euclid(1000);
    format!(
        "{:02}:{:02}:{:02}",
        secs.div_euclid(3600).rem_euclid(24),
        secs.rem_euclid(3600) / 60,
        secs.rem_euclid(60)
    )
}

/// Runs of samples below `threshold`, clipped to `[left, right]`.
fn acid_spans(samples: ChannelSlice<'_>, threshold: f64, left: i64, right: i64) -> Vec<AcidSpan> {
    let mut spans = Vec::new();
    let mut open: Option<(i64, i64)> = None;

    for (&time, &value) in samples.time.iter().zip(samples.values) {
        if value < threshold {
            open = Some(match open {
                Some((start, _)) => (start, time),
                None => (time, time),
            });
        } else if let Some((start, end)) = open.take() {
            spans.push((start, end));
        }
    }
    spans.extend(open);

    spans
        .into_iter()
        .map(|(start, end)| AcidSpan {
            start: start.max(left),
            end: end.min(right),
        })
        .filter(|span| span.start <= span.end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Channel, ImpedanceBlock};

    fn dataset() -> Dataset {
        // pH every second from 0 to 100 s, acidic between 20 s and 30 s.
        let mut ph = Channel::default();
        for s in 0..=100i64 {
            let value = if (20..=30).contains(&s) { 3.5 } else { 6.5 };
            ph.push(s * 1000, value);
        }
        let mut impedance = ImpedanceBlock::default();
        for s in 0..=200i64 {
            impedance.push_row(s * 500, [1.0; 6]);
        }
        Dataset::new(ph, impedance, 11.0)
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(999), "00:00:00");
        assert_eq!(format_clock(3_723_000), "01:02:03");
        assert_eq!(format_clock(25 * 3_600_000 + 5_000), "01:00:05");
    }

    #[test]
    fn test_ticks_include_end() {
        let window_ticks = ticks(0, 60_000, WINDOW_TICK_STEPS);
        assert_eq!(window_ticks.len(), WINDOW_TICK_STEPS + 1);
        assert_eq!(window_ticks[1].time, 10_000);
        assert_eq!(window_ticks[1].label, "00:00:10");
        assert_eq!(window_ticks.last().map(|t| t.time), Some(60_000));

        let overview = ticks(1000, 9000, OVERVIEW_TICK_STEPS);
        let times: Vec<i64> = overview.iter().map(|t| t.time).collect();
        assert_eq!(times, vec![1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000]);
    }

    #[test]
    fn test_frame_slices_every_channel() {
        let data = dataset();
        let labels = LabelSet::new();
        let window = ViewWindow::new(0, 100_000, 10_000);
        let frame = Frame::build(&data, &labels, &window, SearchMode::Exact);

        assert_eq!(frame.channels.len(), 7);
        let ph = frame.channel(ChannelId::Ph).unwrap();
        assert_eq!(ph.samples.time.first(), Some(&0));
        assert_eq!(ph.samples.len(), 10);
        let z3 = frame.channel(ChannelId::Impedance(3)).unwrap();
        assert_eq!(z3.samples.len(), 20);
        assert_eq!(frame.window_ticks.len(), 7);
        assert_eq!(frame.overview_ticks.len(), 9);
    }

    #[test]
    fn test_frame_labels_overlap_window() {
        let data = dataset();
        let labels = LabelSet::from_intervals(vec![
            LabelInterval::new("Reflux", 5_000.0, 15_000.0, [1, 2, 3]),
            LabelInterval::new("Meal", 40_000.0, 50_000.0, [4, 5, 6]),
            LabelInterval::new("Swallow", 30_000.0, 31_000.0, [7, 8, 9]),
        ]);
        let mut window = ViewWindow::new(0, 100_000, 10_000);
        window.jump_to(20_000);
        let frame = Frame::build(&data, &labels, &window, SearchMode::Compatible);

        let names: Vec<&str> = frame.labels.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(names, vec!["Swallow"]);
    }

    #[test]
    fn test_acid_spans() {
        let data = dataset();
        let labels = LabelSet::new();
        let mut window = ViewWindow::new(0, 100_000, 30_000);
        window.jump_to(10_000);
        let frame = Frame::build(&data, &labels, &window, SearchMode::Exact);
        assert_eq!(frame.acid_spans, vec![AcidSpan { start: 20_000, end: 30_000 }]);

        // Window starting mid-run clips the span.
        window.jump_to(25_000);
        let frame = Frame::build(&data, &labels, &window, SearchMode::Compatible);
        assert_eq!(frame.acid_spans, vec![AcidSpan { start: 25_000, end: 30_000 }]);

        window.jump_to(50_000);
        let frame = Frame::build(&data, &labels, &window, SearchMode::Exact);
        assert!(frame.acid_spans.is_empty());
    }
}
