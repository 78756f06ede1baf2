//! Streaming BED reader and the interval stream abstraction the sweep consumes.

use crate::interval::{BedRecord, Interval};
use crate::streaming::buffers::{DEFAULT_INPUT_BUFFER, DEFAULT_LINE_BUFFER};
use crate::streaming::parsing::{parse_bed3_fields, should_skip_line, trim_newline};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading, indexing or sweeping BED data.
#[derive(Error, Debug)]
pub enum BedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid BED format: {0}")]
    InvalidFormat(String),

    #[error("No records in {}", .0.display())]
    EmptySource(PathBuf),
}

pub type Result<T> = std::result::Result<T, BedError>;

/// Sequential producer of sorted records.
///
/// `Ok(None)` is the end-of-stream signal; it is not an error and callers
/// may keep asking after it.
pub trait IntervalStream {
    fn read_next(&mut self) -> Result<Option<BedRecord>>;
}

/// A stream whose cursor can be repositioned to a byte offset.
pub trait SeekableStream: IntervalStream {
    fn seek(&mut self, byte_offset: u64) -> Result<()>;
}

impl<S: IntervalStream + ?Sized> IntervalStream for &mut S {
    #[inline]
    fn read_next(&mut self) -> Result<Option<BedRecord>> {
        (**self).read_next()
    }
}

impl<S: SeekableStream + ?Sized> SeekableStream for &mut S {
    #[inline]
    fn seek(&mut self, byte_offset: u64) -> Result<()> {
        (**self).seek(byte_offset)
    }
}

/// A streaming BED file reader that tracks byte offsets.
pub struct BedReader<R: BufRead> {
    reader: R,
    line_number: usize,
    /// Bytes consumed from the start of the source.
    offset: u64,
    /// Offset of the line that produced the last record.
    record_offset: u64,
    buffer: Vec<u8>,
}

impl BedReader<BufReader<File>> {
    /// Open a BED file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::with_capacity(DEFAULT_INPUT_BUFFER, file)))
    }
}

impl<R: BufRead> BedReader<R> {
    /// Create a new BED reader from any buffered source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            offset: 0,
            record_offset: 0,
            buffer: Vec::with_capacity(DEFAULT_LINE_BUFFER),
        }
    }

    /// Read the next BED record.
    pub fn read_record(&mut self) -> Result<Option<BedRecord>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            let line_offset = self.offset;
            self.offset += bytes_read as u64;
            self.line_number += 1;

            let line = trim_newline(&self.buffer);
            if should_skip_line(line) {
                continue;
            }

            let record = self.parse_line(line)?;
            self.record_offset = line_offset;
            return Ok(Some(record));
        }
    }

    /// Parse a single BED line.
    fn parse_line(&self, line: &[u8]) -> Result<BedRecord> {
        let fields = parse_bed3_fields(line).map_err(|e| self.parse_error(e.message()))?;

        if fields.start > fields.end {
            return Err(self.parse_error(&format!(
                "Start ({}) > end ({})",
                fields.start, fields.end
            )));
        }

        let chrom = std::str::from_utf8(fields.chrom)
            .map_err(|_| self.parse_error("chromosome name is not valid UTF-8"))?;
        let interval = Interval::new(chrom, fields.start, fields.end);

        match fields.rest {
            Some(rest) => {
                let extra = String::from_utf8_lossy(&line[rest..]);
                Ok(BedRecord::with_extra(interval, extra))
            }
            None => Ok(BedRecord::from(interval)),
        }
    }

    fn parse_error(&self, message: &str) -> BedError {
        BedError::Parse {
            line: self.line_number,
            message: message.to_string(),
        }
    }

    /// Bytes consumed so far (the offset of the next unread line).
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Byte offset of the line that produced the most recent record.
    #[inline]
    pub fn record_offset(&self) -> u64 {
        self.record_offset
    }

    /// Number of lines read, including skipped ones.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Get an iterator over all records.
    pub fn records(self) -> BedRecordIter<R> {
        BedRecordIter { reader: self }
    }
}

impl<R: BufRead + Seek> BedReader<R> {
    /// Reposition the reader at an absolute byte offset.
    ///
    /// Line numbers in later parse errors restart from the seek point.
    pub fn seek_to(&mut self, byte_offset: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(byte_offset))?;
        self.offset = byte_offset;
        self.record_offset = byte_offset;
        self.line_number = 0;
        Ok(())
    }
}

impl<R: BufRead> IntervalStream for BedReader<R> {
    #[inline]
    fn read_next(&mut self) -> Result<Option<BedRecord>> {
        self.read_record()
    }
}

impl<R: BufRead + Seek> SeekableStream for BedReader<R> {
    #[inline]
    fn seek(&mut self, byte_offset: u64) -> Result<()> {
        self.seek_to(byte_offset)
    }
}

/// Iterator over BED records.
pub struct BedRecordIter<R: BufRead> {
    reader: BedReader<R>,
}

impl<R: BufRead> Iterator for BedRecordIter<R> {
    type Item = Result<BedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}

/// A stream cut off after a fixed number of records.
///
/// The indexed sweep uses it to keep each run inside one chromosome block,
/// counting records instead of watching for a label change.
pub struct Bounded<S> {
    inner: S,
    remaining: u64,
}

impl<S: IntervalStream> Bounded<S> {
    pub fn new(inner: S, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    /// A stream that yields nothing, without touching `inner`.
    pub fn empty(inner: S) -> Self {
        Self::new(inner, 0)
    }

    /// Records still allowed through.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<S: IntervalStream> IntervalStream for Bounded<S> {
    fn read_next(&mut self) -> Result<Option<BedRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let next = self.inner.read_next()?;
        if next.is_some() {
            self.remaining -= 1;
        } else {
            self.remaining = 0;
        }
        Ok(next)
    }
}

/// Parse records from a string (useful for testing).
pub fn parse_records(content: &str) -> Result<Vec<BedRecord>> {
    BedReader::new(content.as_bytes()).records().collect()
}

/// Parse intervals from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<Interval>> {
    BedReader::new(content.as_bytes())
        .records()
        .map(|r| r.map(|rec| rec.interval))
        .collect()
}
