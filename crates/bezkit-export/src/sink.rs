//! Line sinks.
//!
//! The exporter only needs three things from its output: write a line,
//! flush, close. Any [`std::io::Write`] works through [`WriteSink`];
//! [`StringSink`] collects output in memory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bezkit_common::{BezKitError, Result};
use tracing::debug;

/// Line terminator written after every emitted line.
pub const NEWLINE: &str = "\n";

/// Destination for exported text.
pub trait Sink {
    /// Write one line. The sink appends the terminator.
    fn emit(&mut self, line: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Flush and release the destination. Later writes fail with
    /// `SinkClosed`; closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn emit(&mut self, line: &str) -> Result<()> {
        (**self).emit(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

// ==================== WriteSink ====================

/// Sink over any byte writer.
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    inner: Option<W>,
    lines: usize,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            lines: 0,
        }
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// The writer, unless the sink was closed.
    pub fn into_inner(self) -> Option<W> {
        self.inner
    }

    fn writer(&mut self) -> Result<&mut W> {
        self.inner
            .as_mut()
            .ok_or_else(|| BezKitError::SinkClosed("write after close".to_string()))
    }
}

impl WriteSink<BufWriter<File>> {
    /// Create or truncate a file and write to it through a buffer.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        debug!(path = %path.display(), "opened output file");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn emit(&mut self, line: &str) -> Result<()> {
        let writer = self.writer()?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(NEWLINE.as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer()?.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.inner.take() {
            writer.flush()?;
            debug!(lines = self.lines, "sink closed");
        }
        Ok(())
    }
}

// ==================== StringSink ====================

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct StringSink {
    buffer: String,
    closed: bool,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.buffer.lines()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Sink for StringSink {
    fn emit(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(BezKitError::SinkClosed("write after close".to_string()));
        }
        self.buffer.push_str(line);
        self.buffer.push_str(NEWLINE);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
