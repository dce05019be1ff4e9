//! Interval labels and the ordered label set.

/// A labeled time span.
///
/// `start` and `end` use the time unit of the recording axis (milliseconds)
/// and always satisfy `start <= end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelInterval {
    /// Category name (e.g. "Reflux").
    pub category: String,
    /// Start of the span.
    pub start: f64,
    /// End of the span (inclusive).
    pub end: f64,
    /// Display color, one per category.
    pub color: [u8; 3],
}

impl LabelInterval {
    /// Create a label from two time points in any order.
    pub fn new(category: impl Into<String>, a: f64, b: f64, color: [u8; 3]) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Self {
            category: category.into(),
            start,
            end,
            color,
        }
    }

    /// Whether `time` lies inside the span (both ends inclusive).
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Whether the span intersects `[left, right]`.
    pub fn overlaps(&self, left: f64, right: f64) -> bool {
        self.start <= right && self.end >= left
    }

    /// Span length.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Labels in creation order.
///
/// Overlapping intervals are allowed; the order is insertion order, not time
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelSet {
    intervals: Vec<LabelInterval>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_intervals(intervals: Vec<LabelInterval>) -> Self {
        Self { intervals }
    }

    /// Append a label and return its index.
    pub fn add(&mut self, interval: LabelInterval) -> usize {
        self.intervals.push(interval);
        self.intervals.len() - 1
    }

    /// Remove every label whose span contains `time`.
    ///
    /// Returns how many were removed; zero is a valid no-op.
    pub fn remove_at(&mut self, time: f64) -> usize {
        self.take_at(time).len()
    }

    /// Like [`remove_at`](Self::remove_at) but hands back the removed labels
    /// together with their former indices (ascending), for undo.
    pub fn take_at(&mut self, time: f64) -> Vec<(usize, LabelInterval)> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.intervals.len());
        for (idx, interval) in self.intervals.drain(..).enumerate() {
            if interval.contains(time) {
                removed.push((idx, interval));
            } else {
                kept.push(interval);
            }
        }
        self.intervals = kept;
        removed
    }

    /// Put labels back at their former indices.
    ///
    /// `entries` must be sorted by index ascending, as returned by
    /// [`take_at`](Self::take_at).
    pub fn restore(&mut self, entries: &[(usize, LabelInterval)]) {
        for (idx, interval) in entries {
            let at = (*idx).min(self.intervals.len());
            self.intervals.insert(at, interval.clone());
        }
    }

    /// Remove the label at `index`, if any.
    pub fn remove_index(&mut self, index: usize) -> Option<LabelInterval> {
        (index < self.intervals.len()).then(|| self.intervals.remove(index))
    }

    /// Labels intersecting `[left, right]`, in creation order.
    pub fn overlapping(&self, left: f64, right: f64) -> impl Iterator<Item = &LabelInterval> {
        self.intervals
            .iter()
            .filter(move |i| i.overlaps(left, right))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelInterval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[LabelInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, LabelInterval> {
        self.intervals.iter_mut()
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a LabelInterval;
    type IntoIter = std::slice::Iter<'a, LabelInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEAL: [u8; 3] = [0xcc, 0x78, 0xbc];

    fn sample_set() -> LabelSet {
        LabelSet::from_intervals(vec![
            LabelInterval::new("Reflux", 100.0, 200.0, [1, 115, 178]),
            LabelInterval::new("Meal", 150.0, 400.0, MEAL),
            LabelInterval::new("Swallow", 500.0, 600.0, [213, 94, 0]),
        ])
    }

    #[test]
    fn test_new_sorts_endpoints() {
        let label = LabelInterval::new("Meal", 100.0, 50.0, MEAL);
        assert_eq!(label.start, 50.0);
        assert_eq!(label.end, 100.0);
        assert_eq!(label.duration(), 50.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let label = LabelInterval::new("Meal", 10.0, 20.0, MEAL);
        assert!(label.contains(10.0));
        assert!(label.contains(20.0));
        assert!(!label.contains(20.5));
    }

    #[test]
    fn test_remove_at_removes_all_overlapping() {
        let mut set = sample_set();
        assert_eq!(set.remove_at(175.0), 2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].category, "Swallow");
    }

    #[test]
    fn test_remove_at_twice_is_noop() {
        let mut set = sample_set();
        assert_eq!(set.remove_at(550.0), 1);
        assert_eq!(set.remove_at(550.0), 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_at_outside_everything() {
        let mut set = sample_set();
        assert_eq!(set.remove_at(450.0), 0);
        assert_eq!(set, sample_set());
    }

    #[test]
    fn test_take_and_restore_keeps_order() {
        let mut set = sample_set();
        let removed = set.take_at(175.0);
        assert_eq!(removed.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1]);

        set.restore(&removed);
        assert_eq!(set, sample_set());
    }

    #[test]
    fn test_overlapping_keeps_creation_order() {
        let set = sample_set();
        let names: Vec<_> = set
            .overlapping(180.0, 520.0)
            .map(|l| l.category.as_str())
            .collect();
        assert_eq!(names, vec!["Reflux", "Meal", "Swallow"]);
        assert_eq!(set.overlapping(401.0, 499.0).count(), 0);
    }
}
