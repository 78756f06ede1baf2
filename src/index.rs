//! Per-chromosome block index for sorted BED files.
//!
//! A sorted file stores each chromosome as one contiguous block of lines.
//! The index records, per block, where it starts and ends in bytes, how many
//! records it holds and its longest interval, so a sweep can seek straight
//! to one chromosome.
//!
//! # File format
//!
//! Side file `<source>.idx`, one line per chromosome in first-seen order:
//!
//! ```text
//! chrom<TAB>start_offset<TAB>end_offset<TAB>record_count<TAB>max_interval_length
//! ```

use crate::bed::{BedError, BedReader, Result};
use rustc_hash::FxHashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to a source path to name its index.
pub const INDEX_SUFFIX: &str = ".idx";

/// One chromosome block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromIndexEntry {
    pub chrom: String,
    /// Offset of the block's first record line.
    pub start_offset: u64,
    /// Offset just past the block (start of the next block, or end of file).
    pub end_offset: u64,
    pub record_count: u64,
    /// Longest interval in the block. Recorded but not used by the sweep.
    pub max_interval_length: u64,
}

impl ChromIndexEntry {
    fn open(chrom: &str, offset: u64, length: u64) -> Self {
        Self {
            chrom: chrom.to_string(),
            start_offset: offset,
            end_offset: offset,
            record_count: 1,
            max_interval_length: length,
        }
    }
}

/// Byte range and record count to sweep for one chromosome.
///
/// A chromosome missing from an index resolves to [`BlockRange::EMPTY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start_offset: u64,
    pub end_offset: u64,
    pub record_count: u64,
}

impl BlockRange {
    pub const EMPTY: BlockRange = BlockRange {
        start_offset: 0,
        end_offset: 0,
        record_count: 0,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

impl From<&ChromIndexEntry> for BlockRange {
    fn from(entry: &ChromIndexEntry) -> Self {
        Self {
            start_offset: entry.start_offset,
            end_offset: entry.end_offset,
            record_count: entry.record_count,
        }
    }
}

/// Ordered chromosome index with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct ChromIndex {
    entries: Vec<ChromIndexEntry>,
    by_chrom: FxHashMap<String, usize>,
}

impl ChromIndex {
    /// Create an empty index (a source with no records).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from entries already in block order.
    pub fn from_entries(entries: Vec<ChromIndexEntry>) -> Self {
        let mut by_chrom = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            by_chrom.entry(entry.chrom.clone()).or_insert(i);
        }
        Self { entries, by_chrom }
    }

    /// Index a sorted BED stream in a single forward pass.
    ///
    /// Fails with [`BedError::EmptySource`] when the stream holds no records;
    /// `source` only names the stream in that error.
    pub fn build<R: BufRead>(reader: R, source: &Path) -> Result<Self> {
        let mut reader = BedReader::new(reader);
        let mut entries: Vec<ChromIndexEntry> = Vec::new();

        while let Some(record) = reader.read_record()? {
            let offset = reader.record_offset();
            let length = record.len();

            match entries.last_mut() {
                Some(current) if current.chrom == record.chrom() => {
                    current.record_count += 1;
                    current.max_interval_length = current.max_interval_length.max(length);
                }
                Some(current) => {
                    current.end_offset = offset;
                    entries.push(ChromIndexEntry::open(record.chrom(), offset, length));
                }
                None => entries.push(ChromIndexEntry::open(record.chrom(), offset, length)),
            }
        }

        let Some(last) = entries.last_mut() else {
            return Err(BedError::EmptySource(source.to_path_buf()));
        };
        last.end_offset = reader.offset();

        Ok(Self::from_entries(entries))
    }

    /// Index a sorted BED file.
    pub fn build_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::build(BufReader::new(file), path)
    }

    /// Parse a persisted index.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 5 {
                return Err(BedError::Parse {
                    line: line_num + 1,
                    message: format!("Index line requires 5 fields, got {}", fields.len()),
                });
            }

            let number = |i: usize, name: &str| -> Result<u64> {
                fields[i].parse().map_err(|_| BedError::Parse {
                    line: line_num + 1,
                    message: format!("Invalid {}: '{}'", name, fields[i]),
                })
            };

            let entry = ChromIndexEntry {
                chrom: fields[0].to_string(),
                start_offset: number(1, "start offset")?,
                end_offset: number(2, "end offset")?,
                record_count: number(3, "record count")?,
                max_interval_length: number(4, "max interval length")?,
            };

            if entry.end_offset < entry.start_offset {
                return Err(BedError::InvalidFormat(format!(
                    "index block for {} ends ({}) before it starts ({})",
                    entry.chrom, entry.end_offset, entry.start_offset
                )));
            }
            if entries.iter().any(|e: &ChromIndexEntry| e.chrom == entry.chrom) {
                return Err(BedError::InvalidFormat(format!(
                    "{} appears in more than one index block; is the source sorted?",
                    entry.chrom
                )));
            }
            entries.push(entry);
        }

        Ok(Self::from_entries(entries))
    }

    /// Load a persisted index file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Write the index in its tab-separated form.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut itoa_buf = itoa::Buffer::new();
        for entry in &self.entries {
            writer.write_all(entry.chrom.as_bytes())?;
            for value in [
                entry.start_offset,
                entry.end_offset,
                entry.record_count,
                entry.max_interval_length,
            ] {
                writer.write_all(b"\t")?;
                writer.write_all(itoa_buf.format(value).as_bytes())?;
            }
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Persist the index to `path`, replacing any existing file.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load `<source>.idx` if present, otherwise build and persist it.
    pub fn load_or_build<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = source.as_ref();
        let idx_path = index_path(source);
        if idx_path.exists() {
            log::debug!("Loading index {}", idx_path.display());
            return Self::from_file(&idx_path);
        }
        Self::rebuild(source)
    }

    /// Build the index for `source` and write it next to the source.
    pub fn rebuild<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = source.as_ref();
        let idx_path = index_path(source);
        let index = Self::build_from_path(source)?;
        index.write_to_path(&idx_path)?;
        log::info!(
            "Indexed {} chromosomes of {} into {}",
            index.len(),
            source.display(),
            idx_path.display()
        );
        Ok(index)
    }

    /// Entry for a chromosome, by name.
    #[inline]
    pub fn get(&self, chrom: &str) -> Option<&ChromIndexEntry> {
        self.by_chrom.get(chrom).map(|&i| &self.entries[i])
    }

    /// Block to sweep for a chromosome; empty if the chromosome is absent.
    #[inline]
    pub fn block(&self, chrom: &str) -> BlockRange {
        self.get(chrom).map_or(BlockRange::EMPTY, BlockRange::from)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[ChromIndexEntry] {
        &self.entries
    }

    /// Total records across all chromosomes.
    pub fn record_count(&self) -> u64 {
        self.entries.iter().map(|e| e.record_count).sum()
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index path for a source: the source path with [`INDEX_SUFFIX`] appended.
pub fn index_path<P: AsRef<Path>>(source: P) -> PathBuf {
    let mut path: OsString = source.as_ref().as_os_str().to_owned();
    path.push(INDEX_SUFFIX);
    PathBuf::from(path)
}
