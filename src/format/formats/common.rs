//! Common utilities for recording format conversions.

use crate::format::error::DataError;
use crate::model::{ChannelId, LabelInterval};

/// Parse a millisecond timestamp.
///
/// Integer text is the normal case; float text such as `12000.0` (written by
/// spreadsheet tools once a column contains gaps) is accepted when it holds a
/// whole number.
pub fn parse_time(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

/// Parse a sample value. `NaN` and infinities are rejected since session
/// files cannot store them.
pub fn parse_value(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a float so that parsing it back yields the same bits.
///
/// Debug formatting is shortest round-trip and always keeps a decimal point,
/// e.g. `5.0` or `0.1`.
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Ensure a time axis is non-decreasing (bisection depends on it).
pub fn check_sorted(channel: ChannelId, time: &[i64]) -> Result<(), DataError> {
    match time.windows(2).position(|w| w[1] < w[0]) {
        Some(idx) => Err(DataError::format(format!(
            "{} time axis decreases at sample {} ({} after {})",
            channel,
            idx + 1,
            time[idx + 1],
            time[idx]
        ))),
        None => Ok(()),
    }
}

/// Parse the legacy bracket form of an interval, e.g. `[12000.0, 45000.0]`.
pub fn parse_bracket_pair(text: &str) -> Result<(f64, f64), DataError> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| DataError::label_parse(text))?;

    let mut parts = inner.split(',').map(str::trim);
    let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DataError::label_parse(text));
    };

    match (parse_value(a), parse_value(b)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(DataError::label_parse(text)),
    }
}

/// Build a label from stored cells, validating the color.
pub fn label_from_cells(
    category: &str,
    color: &str,
    start: f64,
    end: f64,
) -> Result<LabelInterval, DataError> {
    let color = crate::color_utils::parse_hex(color)
        .ok_or_else(|| DataError::format(format!("invalid label color '{}'", color)))?;
    Ok(LabelInterval::new(category, start, end, color))
}
