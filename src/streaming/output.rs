//! Hit count reporting.
//!
//! The sweep hands every query record and its count to a [`HitSink`]. The
//! command line uses [`HitWriter`], which formats integers with itoa behind
//! a large buffer; tests usually collect into a `Vec<usize>`.

use crate::bed::BedError;
use crate::interval::BedRecord;
use crate::streaming::buffers::DEFAULT_OUTPUT_BUFFER;
use std::io::{BufWriter, Write};

/// Receiver of one count per query interval, in query order.
pub trait HitSink {
    fn report(&mut self, query: &BedRecord, hits: usize) -> Result<(), BedError>;
}

impl<S: HitSink + ?Sized> HitSink for &mut S {
    #[inline]
    fn report(&mut self, query: &BedRecord, hits: usize) -> Result<(), BedError> {
        (**self).report(query, hits)
    }
}

/// Collects bare counts.
impl HitSink for Vec<usize> {
    #[inline]
    fn report(&mut self, _query: &BedRecord, hits: usize) -> Result<(), BedError> {
        self.push(hits);
        Ok(())
    }
}

/// Writes `<query record>\t<count>` lines.
pub struct HitWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
}

impl<W: Write> HitWriter<W> {
    /// Create a new HitWriter with the default 2MB buffer.
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER, output)
    }

    /// Create a new HitWriter with specified buffer size.
    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
        }
    }

    /// Write a record (BED3 plus any extra columns) without newline.
    #[inline]
    fn write_record(&mut self, record: &BedRecord) -> Result<(), BedError> {
        let iv = &record.interval;
        self.writer.write_all(iv.chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer
            .write_all(self.itoa_buf.format(iv.start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(iv.end).as_bytes())?;
        if let Some(ref extra) = record.extra {
            self.writer.write_all(b"\t")?;
            self.writer.write_all(extra.as_bytes())?;
        }
        Ok(())
    }

    /// Flush the output buffer.
    pub fn flush(&mut self) -> Result<(), BedError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> HitSink for HitWriter<W> {
    #[inline]
    fn report(&mut self, query: &BedRecord, hits: usize) -> Result<(), BedError> {
        self.write_record(query)?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(hits).as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
