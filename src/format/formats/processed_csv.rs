//! Processed recording table (CSV).
//!
//! One comma-separated table holds every channel side by side plus the label
//! columns:
//!
//! | column | content |
//! |--------|---------|
//! | `Time(ms)`, `Value_1`..`Value_6` | impedance axis and leads |
//! | `Time_ph(ms)`, `Value_ph` | pH axis and values |
//! | `labels`, `color_label` | label category and `#rrggbb` color |
//! | `interval_start`, `interval_end` | label span |
//!
//! Columns have different lengths; shorter ones are padded with empty cells.
//! Older files store the span as one `intervals` cell with
//! bracket text (`[12000.0, 45000.0]`); that column is still accepted on
//! import but never written.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::constants::IMPEDANCE_CHANNELS;
use crate::format::document::SessionData;
use crate::format::error::DataError;
use crate::format::formats::common::{
    check_sorted, format_float, label_from_cells, parse_bracket_pair, parse_time, parse_value,
};
use crate::format::traits::{ExportOptions, ExportResult, ImportOptions, SessionFormat};
use crate::model::{Channel, ChannelId, Dataset, ImpedanceBlock, LabelInterval, LabelSet};

const IMPEDANCE_TIME: &str = "Time(ms)";
const IMPEDANCE_VALUES: [&str; IMPEDANCE_CHANNELS] = [
    "Value_1", "Value_2", "Value_3", "Value_4", "Value_5", "Value_6",
];
const PH_TIME: &str = "Time_ph(ms)";
const PH_VALUE: &str = "Value_ph";
const LABEL_CATEGORY: &str = "labels";
const LABEL_COLOR: &str = "color_label";
const LABEL_START: &str = "interval_start";
const LABEL_END: &str = "interval_end";
const LEGACY_INTERVALS: &str = "intervals";

/// Processed recording table with labels.
pub struct ProcessedCsvFormat;

/// Column positions resolved from the header row.
struct Columns {
    impedance_time: usize,
    impedance: [usize; IMPEDANCE_CHANNELS],
    ph_time: usize,
    ph_value: usize,
    labels: Option<LabelColumns>,
}

struct LabelColumns {
    category: usize,
    color: usize,
    span: SpanColumns,
}

enum SpanColumns {
    Structured { start: usize, end: usize },
    Legacy(usize),
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataError> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        let require = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| DataError::format(format!("missing column '{}'", name)))
        };

        let mut impedance = [0; IMPEDANCE_CHANNELS];
        for (slot, name) in impedance.iter_mut().zip(IMPEDANCE_VALUES) {
            *slot = require(name)?;
        }

        let span = match (
            index.get(LABEL_START),
            index.get(LABEL_END),
            index.get(LEGACY_INTERVALS),
        ) {
            (Some(&start), Some(&end), _) => Some(SpanColumns::Structured { start, end }),
            (_, _, Some(&legacy)) => Some(SpanColumns::Legacy(legacy)),
            _ => None,
        };
        let labels = match (index.get(LABEL_CATEGORY), index.get(LABEL_COLOR), span) {
            (Some(&category), Some(&color), Some(span)) => Some(LabelColumns {
                category,
                color,
                span,
            }),
            _ => {
                log::warn!("No label columns found, importing signals only");
                None
            }
        };

        Ok(Self {
            impedance_time: require(IMPEDANCE_TIME)?,
            impedance,
            ph_time: require(PH_TIME)?,
            ph_value: require(PH_VALUE)?,
            labels,
        })
    }
}

/// Cell content, with missing and blank cells both mapped to None.
fn cell<'r>(record: &'r csv::StringRecord, idx: usize) -> Option<&'r str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn row_number(record: &csv::StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

impl ProcessedCsvFormat {
    fn read_impedance(
        record: &csv::StringRecord,
        cols: &Columns,
        block: &mut ImpedanceBlock,
    ) -> Result<bool, DataError> {
        let Some(time_text) = cell(record, cols.impedance_time) else {
            return Ok(false);
        };
        let line = row_number(record);
        let time = parse_time(time_text)
            .ok_or_else(|| DataError::at_line(line, format!("bad time '{}'", time_text)))?;

        let mut values = [0.0; IMPEDANCE_CHANNELS];
        for (slot, (&idx, name)) in values
            .iter_mut()
            .zip(cols.impedance.iter().zip(IMPEDANCE_VALUES))
        {
            let text = cell(record, idx)
                .ok_or_else(|| DataError::at_line(line, format!("missing {}", name)))?;
            *slot = parse_value(text)
                .ok_or_else(|| DataError::at_line(line, format!("bad {} '{}'", name, text)))?;
        }
        block.push_row(time, values);
        Ok(true)
    }

    fn read_ph(
        record: &csv::StringRecord,
        cols: &Columns,
        ph: &mut Channel,
    ) -> Result<bool, DataError> {
        let (Some(time_text), Some(value_text)) =
            (cell(record, cols.ph_time), cell(record, cols.ph_value))
        else {
            return Ok(false);
        };
        let line = row_number(record);
        let time = parse_time(time_text)
            .ok_or_else(|| DataError::at_line(line, format!("bad pH time '{}'", time_text)))?;
        let value = parse_value(value_text)
            .ok_or_else(|| DataError::at_line(line, format!("bad pH '{}'", value_text)))?;
        ph.push(time, value);
        Ok(true)
    }

    fn read_label(
        record: &csv::StringRecord,
        cols: &LabelColumns,
    ) -> Result<Option<LabelInterval>, DataError> {
        let (Some(category), Some(color)) = (cell(record, cols.category), cell(record, cols.color))
        else {
            return Ok(None);
        };

        let span = match cols.span {
            SpanColumns::Structured { start, end } => {
                match (cell(record, start), cell(record, end)) {
                    (Some(a), Some(b)) => match (parse_value(a), parse_value(b)) {
                        (Some(a), Some(b)) => Some((a, b)),
                        _ => return Err(DataError::label_parse(format!("[{}, {}]", a, b))),
                    },
                    _ => None,
                }
            }
            SpanColumns::Legacy(idx) => cell(record, idx).map(parse_bracket_pair).transpose()?,
        };

        match span {
            Some((a, b)) => label_from_cells(category, color, a, b).map(Some),
            None => Ok(None),
        }
    }
}

impl SessionFormat for ProcessedCsvFormat {
    fn id(&self) -> &'static str {
        "csv"
    }

    fn display_name(&self) -> &'static str {
        "Processed signal (CSV)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    fn supports_export(&self) -> bool {
        true
    }

    fn supports_labels(&self) -> bool {
        true
    }

    fn import_from_reader(
        &self,
        reader: &mut dyn BufRead,
        options: &ImportOptions,
    ) -> Result<SessionData, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        let cols = Columns::resolve(csv_reader.headers()?)?;

        let mut impedance = ImpedanceBlock::default();
        let mut ph = Channel::default();
        let mut labels = Vec::new();
        let mut dropped_ph = 0usize;
        let mut dropped_labels = 0usize;
        let mut rows = 0usize;

        let mut record = csv::StringRecord::new();
        while csv_reader.read_record(&mut record)? {
            rows += 1;
            Self::read_impedance(&record, &cols, &mut impedance)?;
            let ph_present =
                cell(&record, cols.ph_time).is_some() || cell(&record, cols.ph_value).is_some();
            if !Self::read_ph(&record, &cols, &mut ph)? && ph_present {
                dropped_ph += 1;
            }
            if let Some(label_cols) = &cols.labels {
                match Self::read_label(&record, label_cols)? {
                    Some(label) => labels.push(label),
                    None => {
                        let any = [label_cols.category, label_cols.color]
                            .iter()
                            .any(|&idx| cell(&record, idx).is_some());
                        if any {
                            dropped_labels += 1;
                        }
                    }
                }
            }
        }

        if dropped_ph > 0 {
            log::warn!("Dropped {} incomplete pH rows", dropped_ph);
        }
        if dropped_labels > 0 {
            log::warn!("Dropped {} incomplete label rows", dropped_labels);
        }
        log::debug!("Read {} table rows", rows);

        let data = SessionData::new(
            Dataset::new(ph, impedance, options.impedance_ceiling),
            LabelSet::from_intervals(labels),
        );
        data.validate()?;
        check_sorted(ChannelId::Ph, &data.dataset.ph.time)?;
        check_sorted(ChannelId::Impedance(1), &data.dataset.impedance.time)?;
        Ok(data)
    }

    fn export_to_writer(
        &self,
        data: &SessionData,
        writer: &mut dyn Write,
        _options: &ExportOptions,
    ) -> Result<ExportResult, DataError> {
        let dataset = &data.dataset;
        let labels = data.labels.as_slice();
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![IMPEDANCE_TIME];
        header.extend(IMPEDANCE_VALUES);
        header.extend([
            PH_TIME,
            PH_VALUE,
            LABEL_CATEGORY,
            LABEL_COLOR,
            LABEL_START,
            LABEL_END,
        ]);
        csv_writer.write_record(&header)?;

        let rows = dataset
            .impedance
            .len()
            .max(dataset.ph.len())
            .max(labels.len());
        for i in 0..rows {
            match dataset.impedance.time.get(i) {
                Some(time) => {
                    csv_writer.write_field(time.to_string())?;
                    for lead in &dataset.impedance.leads {
                        csv_writer.write_field(format_float(lead[i]))?;
                    }
                }
                None => {
                    for _ in 0..=IMPEDANCE_CHANNELS {
                        csv_writer.write_field("")?;
                    }
                }
            }

            match (dataset.ph.time.get(i), dataset.ph.values.get(i)) {
                (Some(time), Some(value)) => {
                    csv_writer.write_field(time.to_string())?;
                    csv_writer.write_field(format_float(*value))?;
                }
                _ => {
                    csv_writer.write_field("")?;
                    csv_writer.write_field("")?;
                }
            }

            match labels.get(i) {
                Some(label) => {
                    csv_writer.write_field(&label.category)?;
                    csv_writer.write_field(crate::color_utils::to_hex(label.color))?;
                    csv_writer.write_field(format_float(label.start))?;
                    csv_writer.write_field(format_float(label.end))?;
                }
                None => {
                    for _ in 0..4 {
                        csv_writer.write_field("")?;
                    }
                }
            }
            csv_writer.write_record(None::<&[u8]>)?;
        }
        csv_writer.flush()?;

        Ok(ExportResult {
            rows_written: rows,
            labels_exported: labels.len(),
            files_created: Vec::new(),
        })
    }
}
