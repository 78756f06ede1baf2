//! Core interval types and the overlap predicates the sweep is built on.

use std::cmp::Ordering;
use std::fmt;

/// Overlap amount reported when there is nothing to compare against.
pub const NO_OVERLAP: i64 = -1;

/// A genomic interval with chromosome, start, and end positions.
/// Uses 0-based, half-open coordinates (BED format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create a new interval.
    #[inline]
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Returns the length of the interval.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the interval has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Signed overlap with another interval on the same chromosome.
    ///
    /// Positive: bp of overlap. Zero: book-ended. Negative: bp gap between
    /// them. Intervals on different chromosomes report [`NO_OVERLAP`].
    #[inline]
    pub fn overlap_amount(&self, other: &Interval) -> i64 {
        if self.chrom != other.chrom {
            return NO_OVERLAP;
        }
        let lo = self.start.max(other.start);
        let hi = self.end.min(other.end);
        if hi >= lo {
            i64::try_from(hi - lo).unwrap_or(i64::MAX)
        } else {
            i64::try_from(lo - hi).map_or(i64::MIN, |gap| -gap)
        }
    }

    /// Check if this interval overlaps another by at least one base.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.overlap_amount(other) > 0
    }

    /// Is this interval entirely to the right of `other`?
    ///
    /// Once a sorted query is after a database interval, that interval can
    /// never overlap this or any later query.
    #[inline]
    pub fn is_after(&self, other: &Interval) -> bool {
        self.start >= other.end
    }
}

/// Overlap amount against an optional partner; an absent partner never overlaps.
#[inline]
pub fn overlap_amount(a: &Interval, b: Option<&Interval>) -> i64 {
    b.map_or(NO_OVERLAP, |b| a.overlap_amount(b))
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.end)
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A BED record: the interval plus any columns after the third, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRecord {
    pub interval: Interval,
    /// Columns 4+ as they appeared in the source (tab-joined), if any.
    pub extra: Option<String>,
}

impl BedRecord {
    /// Create a minimal BED3 record.
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            interval: Interval::new(chrom, start, end),
            extra: None,
        }
    }

    /// Create a record carrying extra columns.
    pub fn with_extra(interval: Interval, extra: impl Into<String>) -> Self {
        Self {
            interval,
            extra: Some(extra.into()),
        }
    }

    /// Get the chromosome.
    #[inline]
    pub fn chrom(&self) -> &str {
        &self.interval.chrom
    }

    /// Get the start position.
    #[inline]
    pub fn start(&self) -> u64 {
        self.interval.start
    }

    /// Get the end position.
    #[inline]
    pub fn end(&self) -> u64 {
        self.interval.end
    }

    /// Get the interval length.
    #[inline]
    pub fn len(&self) -> u64 {
        self.interval.len()
    }

    /// Check if the interval is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interval.is_empty()
    }
}

impl From<Interval> for BedRecord {
    fn from(interval: Interval) -> Self {
        Self {
            interval,
            extra: None,
        }
    }
}

impl fmt::Display for BedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.interval)?;
        if let Some(ref extra) = self.extra {
            write!(f, "\t{}", extra)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_amount() {
        let a = Interval::new("chr1", 10, 20);
        let b = Interval::new("chr1", 15, 25);
        let c = Interval::new("chr1", 20, 30);
        let d = Interval::new("chr1", 22, 30);

        assert_eq!(a.overlap_amount(&b), 5);
        assert_eq!(a.overlap_amount(&c), 0); // Book-ended
        assert_eq!(a.overlap_amount(&d), -2); // 2bp gap
        assert_eq!(d.overlap_amount(&a), -2);
    }

    #[test]
    fn test_overlap_amount_absent_or_other_chrom() {
        let a = Interval::new("chr1", 10, 20);
        let b = Interval::new("chr2", 10, 20);

        assert_eq!(overlap_amount(&a, None), NO_OVERLAP);
        assert_eq!(overlap_amount(&a, Some(&b)), NO_OVERLAP);
        assert_eq!(overlap_amount(&a, Some(&a)), 10);
    }

    #[test]
    fn test_book_ended_is_not_overlap() {
        let a = Interval::new("chr1", 100, 200);
        let b = Interval::new("chr1", 200, 300);

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_is_after() {
        let a = Interval::new("chr1", 100, 200);
        let b = Interval::new("chr1", 200, 300);

        assert!(b.is_after(&a)); // b starts where a ends
        assert!(!a.is_after(&b));
        assert!(!a.is_after(&a));
    }

    #[test]
    fn test_overlap_amount_large_coordinates() {
        let a = Interval::new("chr1", 0, u64::MAX);
        let b = Interval::new("chr1", 1, u64::MAX);
        assert_eq!(a.overlap_amount(&b), i64::MAX);

        let c = Interval::new("chr1", 0, 1);
        let d = Interval::new("chr1", 249_000_000, 249_000_100);
        assert_eq!(c.overlap_amount(&d), -248_999_999);
    }

    #[test]
    fn test_record_display_keeps_extra_columns() {
        let rec = BedRecord::with_extra(Interval::new("chr1", 5, 15), "gene1\t0\t+");
        assert_eq!(rec.to_string(), "chr1\t5\t15\tgene1\t0\t+");
        assert_eq!(BedRecord::new("chr2", 1, 4).to_string(), "chr2\t1\t4");
    }
}
