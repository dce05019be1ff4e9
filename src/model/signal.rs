//! Recorded channels and the dataset that owns them.

use crate::constants::{DEFAULT_IMPEDANCE_CEILING, IMPEDANCE_CHANNELS};

/// Identifier of one recorded channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelId {
    /// Reference pH lead.
    Ph,
    /// Impedance lead 1..=6.
    Impedance(u8),
}

impl ChannelId {
    /// All seven channels in display order (pH first).
    pub fn all() -> [ChannelId; IMPEDANCE_CHANNELS + 1] {
        [
            ChannelId::Ph,
            ChannelId::Impedance(1),
            ChannelId::Impedance(2),
            ChannelId::Impedance(3),
            ChannelId::Impedance(4),
            ChannelId::Impedance(5),
            ChannelId::Impedance(6),
        ]
    }

    /// Short display name ("pH", "Z1".."Z6").
    pub fn name(&self) -> String {
        match self {
            ChannelId::Ph => "pH".to_string(),
            ChannelId::Impedance(n) => format!("Z{}", n),
        }
    }

    /// Index into the impedance columns, if this is an impedance lead.
    fn impedance_index(&self) -> Option<usize> {
        match self {
            ChannelId::Impedance(n) if (1..=IMPEDANCE_CHANNELS as u8).contains(n) => {
                Some(*n as usize - 1)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// A single (time, value) sequence with its own time axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    /// Sample times in milliseconds, non-decreasing.
    pub time: Vec<i64>,
    /// Sample values, same length as `time`.
    pub values: Vec<f64>,
}

impl Channel {
    pub fn new(time: Vec<i64>, values: Vec<f64>) -> Self {
        debug_assert_eq!(time.len(), values.len());
        Self { time, values }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn push(&mut self, time: i64, value: f64) {
        self.time.push(time);
        self.values.push(value);
    }
}

/// Borrowed view of one channel: a time axis and its values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSlice<'a> {
    pub time: &'a [i64],
    pub values: &'a [f64],
}

impl<'a> ChannelSlice<'a> {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sub-slice by sample index range (bounds are clamped to the length).
    pub fn range(&self, from: usize, to: usize) -> ChannelSlice<'a> {
        let to = to.min(self.time.len());
        let from = from.min(to);
        ChannelSlice {
            time: &self.time[from..to],
            values: &self.values[from..to],
        }
    }
}

/// Impedance leads sharing one time axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpedanceBlock {
    /// Shared time axis in milliseconds.
    pub time: Vec<i64>,
    /// One value column per lead.
    pub leads: [Vec<f64>; IMPEDANCE_CHANNELS],
}

impl ImpedanceBlock {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn push_row(&mut self, time: i64, values: [f64; IMPEDANCE_CHANNELS]) {
        self.time.push(time);
        for (lead, value) in self.leads.iter_mut().zip(values) {
            lead.push(value);
        }
    }

    /// Move all rows of `other` to the end of this block.
    pub fn append(&mut self, other: &mut ImpedanceBlock) {
        self.time.append(&mut other.time);
        for (lead, more) in self.leads.iter_mut().zip(other.leads.iter_mut()) {
            lead.append(more);
        }
    }

    /// Clamp every value above `ceiling` down to it. Returns the number of
    /// values changed.
    pub fn clip(&mut self, ceiling: f64) -> usize {
        let mut clipped = 0;
        for lead in &mut self.leads {
            for value in lead.iter_mut() {
                if *value > ceiling {
                    *value = ceiling;
                    clipped += 1;
                }
            }
        }
        clipped
    }
}

/// All seven channels of one recording.
///
/// Built wholesale by an import; the clipping pass at ingestion is the only
/// mutation after that.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub ph: Channel,
    pub impedance: ImpedanceBlock,
    /// Ceiling applied to impedance values for plot scaling.
    pub impedance_ceiling: f64,
}

impl Dataset {
    pub fn new(ph: Channel, impedance: ImpedanceBlock, impedance_ceiling: f64) -> Self {
        Self {
            ph,
            impedance,
            impedance_ceiling,
        }
    }

    /// Borrow a channel by identifier.
    pub fn channel(&self, id: ChannelId) -> Option<ChannelSlice<'_>> {
        match id {
            ChannelId::Ph => Some(ChannelSlice {
                time: &self.ph.time,
                values: &self.ph.values,
            }),
            other => other.impedance_index().map(|idx| ChannelSlice {
                time: &self.impedance.time,
                values: &self.impedance.leads[idx],
            }),
        }
    }

    /// Iterate over all channels in display order.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, ChannelSlice<'_>)> {
        ChannelId::all()
            .into_iter()
            .filter_map(move |id| self.channel(id).map(|slice| (id, slice)))
    }

    /// Earliest pH sample time.
    pub fn min_time(&self) -> Option<i64> {
        self.ph.time.iter().copied().min()
    }

    /// Latest impedance sample time.
    pub fn max_time(&self) -> Option<i64> {
        self.impedance.time.iter().copied().max()
    }

    /// Clamp impedance values to the dataset ceiling. pH is left untouched.
    pub fn clip_impedance(&mut self) -> usize {
        self.impedance.clip(self.impedance_ceiling)
    }

    /// The first channel with no samples, if any.
    pub fn first_empty_channel(&self) -> Option<ChannelId> {
        if self.ph.is_empty() {
            Some(ChannelId::Ph)
        } else if self.impedance.is_empty() {
            Some(ChannelId::Impedance(1))
        } else {
            None
        }
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new(
            Channel::default(),
            ImpedanceBlock::default(),
            DEFAULT_IMPEDANCE_CEILING,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with(values: &[f64]) -> ImpedanceBlock {
        let mut block = ImpedanceBlock::default();
        for (i, v) in values.iter().enumerate() {
            block.push_row(i as i64 * 10, [*v; IMPEDANCE_CHANNELS]);
        }
        block
    }

    #[test]
    fn test_clip_only_upper() {
        let mut block = block_with(&[5.0, 11.0, 12.0, 100.0, -3.0]);
        let clipped = block.clip(11.0);
        assert_eq!(clipped, 2 * IMPEDANCE_CHANNELS);
        for lead in &block.leads {
            assert_eq!(lead, &vec![5.0, 11.0, 11.0, 11.0, -3.0]);
        }
    }

    #[test]
    fn test_clip_dataset_leaves_ph() {
        let ph = Channel::new(vec![0, 10], vec![12.0, 2.0]);
        let mut dataset = Dataset::new(ph, block_with(&[20.0, 1.0]), 11.0);
        dataset.clip_impedance();
        assert_eq!(dataset.ph.values, vec![12.0, 2.0]);
        assert_eq!(dataset.impedance.leads[3], vec![11.0, 1.0]);
    }

    #[test]
    fn test_channel_lookup_by_id() {
        let ph = Channel::new(vec![5, 15], vec![7.0, 6.5]);
        let mut block = ImpedanceBlock::default();
        block.push_row(0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let dataset = Dataset::new(ph, block, 11.0);

        assert_eq!(dataset.channel(ChannelId::Ph).map(|c| c.len()), Some(2));
        let z4 = dataset.channel(ChannelId::Impedance(4)).expect("Z4 exists");
        assert_eq!(z4.values, &[4.0]);
        assert!(dataset.channel(ChannelId::Impedance(7)).is_none());
        assert_eq!(dataset.channels().count(), 7);
    }

    #[test]
    fn test_bounds_come_from_reference_axes() {
        let ph = Channel::new(vec![100, 200], vec![7.0, 6.5]);
        let dataset = Dataset::new(ph, block_with(&[1.0, 1.0, 1.0]), 11.0);
        assert_eq!(dataset.min_time(), Some(100));
        assert_eq!(dataset.max_time(), Some(20));
    }

    #[test]
    fn test_append_concatenates_chunks() {
        let mut first = block_with(&[1.0, 2.0]);
        let mut second = block_with(&[3.0]);
        first.append(&mut second);
        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        assert_eq!(first.leads[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_slice_range_clamps() {
        let ph = Channel::new(vec![1, 2, 3], vec![1.0, 2.0, 3.0]);
        let dataset = Dataset::new(ph, block_with(&[1.0]), 11.0);
        let slice = dataset.channel(ChannelId::Ph).expect("pH exists");
        assert_eq!(slice.range(1, 10).time, &[2, 3]);
        assert!(slice.range(5, 2).is_empty());
        assert_eq!(ChannelId::Impedance(3).to_string(), "Z3");
    }
}
