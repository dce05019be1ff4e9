//! Raw device export reader.
//!
//! The recorder's text export holds three sections, each introduced by a
//! marker line: `Ph Array`, `Impedance Array` and `Diary`. Data rows of a
//! section start four lines after its marker and stop before the line that
//! immediately precedes the next marker. Rows are tab-delimited:
//!
//! ```text
//! Ph Array
//! <3 header lines>
//! 1000\t6.8
//! ...
//! <separator line>
//! Impedance Array
//! <3 header lines>
//! 1000\t2.1\t2.3\t2.0\t1.9\t2.4\t2.2
//! ...
//! <separator line>
//! Diary
//! ...
//! ```
//!
//! The file is streamed line by line. Impedance rows are collected in chunks
//! of [`ImportOptions::chunk_rows`] and appended to the channel columns chunk
//! by chunk. The diary is ignored.

use std::io::{BufRead, Write};

use crate::constants::{IMPEDANCE_CHANNELS, RAW_HEADER_SKIP};
use crate::format::document::SessionData;
use crate::format::error::DataError;
use crate::format::formats::common::{check_sorted, parse_time, parse_value};
use crate::format::traits::{ExportOptions, ExportResult, ImportOptions, SessionFormat};
use crate::model::{Channel, ChannelId, Dataset, ImpedanceBlock, LabelSet};

const PH_MARKER: &str = "Ph Array";
const IMPEDANCE_MARKER: &str = "Impedance Array";
const DIARY_MARKER: &str = "Diary";

/// Raw text export of the recording device (import only).
pub struct RawExportFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Ph,
    Impedance,
    Diary,
}

impl Section {
    fn from_marker(line: &str) -> Option<Self> {
        match line {
            PH_MARKER => Some(Section::Ph),
            IMPEDANCE_MARKER => Some(Section::Impedance),
            DIARY_MARKER => Some(Section::Diary),
            _ => None,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Section::Preamble => "",
            Section::Ph => PH_MARKER,
            Section::Impedance => IMPEDANCE_MARKER,
            Section::Diary => DIARY_MARKER,
        }
    }

    /// The section whose marker must come next.
    fn next(self) -> Option<Self> {
        match self {
            Section::Preamble => Some(Section::Ph),
            Section::Ph => Some(Section::Impedance),
            Section::Impedance => Some(Section::Diary),
            Section::Diary => None,
        }
    }
}

/// Streaming parser state.
struct RawParser {
    section: Section,
    /// Header lines left to skip in the current section.
    skip: usize,
    /// Last row read; committed only once a further non-marker line shows it
    /// is not the separator before the next marker.
    pending: Option<(usize, String)>,
    ph: Channel,
    impedance: ImpedanceBlock,
    chunk: ImpedanceBlock,
    chunk_rows: usize,
    chunks_flushed: usize,
}

impl RawParser {
    fn new(chunk_rows: usize) -> Self {
        Self {
            section: Section::Preamble,
            skip: 0,
            pending: None,
            ph: Channel::default(),
            impedance: ImpedanceBlock::default(),
            chunk: ImpedanceBlock::default(),
            chunk_rows: chunk_rows.max(1),
            chunks_flushed: 0,
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), DataError> {
        // Free text once the diary starts.
        if self.section == Section::Diary {
            return Ok(());
        }
        if let Some(section) = Section::from_marker(line) {
            return self.enter(line_no, section);
        }

        match self.section {
            Section::Preamble | Section::Diary => Ok(()),
            Section::Ph | Section::Impedance => {
                if self.skip > 0 {
                    self.skip -= 1;
                    return Ok(());
                }
                match self.pending.replace((line_no, line.to_string())) {
                    Some((prev_no, prev)) => self.commit_row(prev_no, &prev),
                    None => Ok(()),
                }
            }
        }
    }

    fn enter(&mut self, line_no: usize, section: Section) -> Result<(), DataError> {
        if self.section.next() != Some(section) {
            return Err(DataError::at_line(
                line_no,
                format!("unexpected '{}' marker", section.marker()),
            ));
        }

        // The line right before a marker is the section separator.
        self.pending = None;
        self.section = section;
        self.skip = RAW_HEADER_SKIP - 1;
        log::debug!("Raw export: '{}' at line {}", section.marker(), line_no);
        Ok(())
    }

    fn commit_row(&mut self, line_no: usize, line: &str) -> Result<(), DataError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let fields: Vec<&str> = line.split('\t').collect();

        match self.section {
            Section::Ph => {
                if fields.len() < 2 {
                    return Err(DataError::at_line(line_no, "pH row needs time and value"));
                }
                let time = parse_time(fields[0])
                    .ok_or_else(|| DataError::at_line(line_no, format!("bad time '{}'", fields[0])))?;
                let value = parse_value(fields[1])
                    .ok_or_else(|| DataError::at_line(line_no, format!("bad pH '{}'", fields[1])))?;
                self.ph.push(time, value);
            }
            Section::Impedance => {
                if fields.len() < IMPEDANCE_CHANNELS + 1 {
                    return Err(DataError::at_line(
                        line_no,
                        format!(
                            "impedance row needs {} columns, found {}",
                            IMPEDANCE_CHANNELS + 1,
                            fields.len()
                        ),
                    ));
                }
                let time = parse_time(fields[0])
                    .ok_or_else(|| DataError::at_line(line_no, format!("bad time '{}'", fields[0])))?;
                let mut values = [0.0; IMPEDANCE_CHANNELS];
                for (slot, field) in values.iter_mut().zip(&fields[1..=IMPEDANCE_CHANNELS]) {
                    *slot = parse_value(field).ok_or_else(|| {
                        DataError::at_line(line_no, format!("bad impedance '{}'", field))
                    })?;
                }
                self.chunk.push_row(time, values);
                if self.chunk.len() >= self.chunk_rows {
                    self.flush_chunk();
                }
            }
            Section::Preamble | Section::Diary => {}
        }
        Ok(())
    }

    fn flush_chunk(&mut self) {
        if self.chunk.is_empty() {
            return;
        }
        self.chunks_flushed += 1;
        log::debug!(
            "Raw export: impedance chunk {} ({} rows)",
            self.chunks_flushed,
            self.chunk.len()
        );
        self.impedance.append(&mut self.chunk);
    }

    fn finish(mut self, ceiling: f64) -> Result<Dataset, DataError> {
        if self.section != Section::Diary {
            let missing = self
                .section
                .next()
                .map(Section::marker)
                .unwrap_or(DIARY_MARKER);
            return Err(DataError::format(format!(
                "missing section marker '{}'",
                missing
            )));
        }
        self.flush_chunk();

        let mut dataset = Dataset::new(self.ph, self.impedance, ceiling);
        if let Some(channel) = dataset.first_empty_channel() {
            return Err(DataError::EmptyData { channel });
        }
        check_sorted(ChannelId::Ph, &dataset.ph.time)?;
        check_sorted(ChannelId::Impedance(1), &dataset.impedance.time)?;

        let clipped = dataset.clip_impedance();
        if clipped > 0 {
            log::info!(
                "Clipped {} impedance values to ceiling {}",
                clipped,
                ceiling
            );
        }
        Ok(dataset)
    }
}

impl RawExportFormat {
    /// Parse a raw export into a dataset (clipped, validated).
    pub fn read_dataset(
        reader: &mut dyn BufRead,
        options: &ImportOptions,
    ) -> Result<Dataset, DataError> {
        let mut parser = RawParser::new(options.chunk_rows);
        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            parser.feed(line_no, line.trim_end_matches(['\n', '\r']))?;
        }
        parser.finish(options.impedance_ceiling)
    }
}

impl SessionFormat for RawExportFormat {
    fn id(&self) -> &'static str {
        "raw"
    }

    fn display_name(&self) -> &'static str {
        "Recorder raw export (TXT)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn supports_export(&self) -> bool {
        false
    }

    fn supports_labels(&self) -> bool {
        false
    }

    fn import_from_reader(
        &self,
        reader: &mut dyn BufRead,
        options: &ImportOptions,
    ) -> Result<SessionData, DataError> {
        let dataset = Self::read_dataset(reader, options)?;
        Ok(SessionData::new(dataset, LabelSet::new()))
    }

    fn export_to_writer(
        &self,
        _data: &SessionData,
        _writer: &mut dyn Write,
        _options: &ExportOptions,
    ) -> Result<ExportResult, DataError> {
        Err(DataError::UnsupportedOperation(
            "raw recorder exports are read-only".to_string(),
        ))
    }
}
