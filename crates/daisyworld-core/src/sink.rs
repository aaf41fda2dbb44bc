//! Output sinks: consumers of the per-tick record stream.
//!
//! The runner calls [`OutputSink::accept`] once per record in increasing
//! tick order (starting with the tick-0 snapshot) and
//! [`OutputSink::finalize`] once after the last record.
//!
//! The CSV encoding is the positional, headerless format read by the
//! existing chart renderer:
//!
//! ```text
//! white_fraction,black_fraction,planetary_temperature
//! ```
//!
//! Values use Rust's shortest round-trip `f64` formatting, so parsing a row
//! yields exactly the values the engine computed.

use std::io::Write;

use daisyworld_types::TickRecord;

/// Errors raised by an output sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing to the underlying stream failed.
    #[error("sink I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Encoding a record failed.
    #[error("sink serialization error: {source}")]
    Serialization {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Consumer of the per-tick record stream.
pub trait OutputSink {
    /// Receive the next record.
    fn accept(&mut self, record: &TickRecord) -> Result<(), SinkError>;

    /// Called once after the last record.
    fn finalize(&mut self) -> Result<(), SinkError>;
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl OutputSink for NoOpSink {
    fn accept(&mut self, _record: &TickRecord) -> Result<(), SinkError> {
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// A sink that keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TickRecord>,
    finalized: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            finalized: false,
        }
    }

    /// Records received so far.
    pub fn records(&self) -> &[TickRecord] {
        &self.records
    }

    /// Whether [`OutputSink::finalize`] has been called.
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Consume the sink and return its records.
    pub fn into_records(self) -> Vec<TickRecord> {
        self.records
    }
}

impl OutputSink for MemorySink {
    fn accept(&mut self, record: &TickRecord) -> Result<(), SinkError> {
        self.records.push(*record);
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.finalized = true;
        Ok(())
    }
}

/// Writes headerless `white,black,temperature` rows.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    percent: bool,
}

impl<W: Write> CsvSink<W> {
    /// Create a sink writing coverage as fractions.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            percent: false,
        }
    }

    /// Write coverage as percentages (0-100) instead of fractions.
    #[must_use]
    pub const fn with_percent(mut self, percent: bool) -> Self {
        self.percent = percent;
        self
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for CsvSink<W> {
    fn accept(&mut self, record: &TickRecord) -> Result<(), SinkError> {
        let scale = if self.percent { 100.0 } else { 1.0 };
        writeln!(
            self.writer,
            "{},{},{}",
            record.white_fraction * scale,
            record.black_fraction * scale,
            record.planetary_temperature
        )?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one JSON-encoded [`TickRecord`] per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a JSON-lines sink.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for JsonLinesSink<W> {
    fn accept(&mut self, record: &TickRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}
