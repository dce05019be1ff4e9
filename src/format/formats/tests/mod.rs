//! Unit tests for recording format implementations.
//!
//! These tests verify the correctness of parsing, serialization and
//! round-trip conversions between the writable formats.

mod roundtrip_tests;
mod scribe_json_tests;

use crate::format::document::SessionData;
use crate::model::{Channel, Dataset, ImpedanceBlock, LabelInterval, LabelSet};

/// Build a small session: `ph_len` pH samples and `imp_len` impedance rows,
/// both one second apart from t = 1000 ms.
pub(super) fn make_session(ph_len: usize, imp_len: usize, labels: Vec<LabelInterval>) -> SessionData {
    let mut ph = Channel::default();
    for i in 0..ph_len {
        ph.push(1000 + i as i64 * 1000, 7.0 - i as f64 * 0.5);
    }
    let mut impedance = ImpedanceBlock::default();
    for i in 0..imp_len {
        let base = i as f64 * 0.25;
        impedance.push_row(
            1000 + i as i64 * 1000,
            [base + 1.0, base + 2.0, base + 3.0, base + 4.0, base + 5.0, 11.0],
        );
    }
    SessionData::new(
        Dataset::new(ph, impedance, 11.0),
        LabelSet::from_intervals(labels),
    )
}
