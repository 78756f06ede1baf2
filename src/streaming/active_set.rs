//! Active cache for the chromosome sweep.
//!
//! Holds the database intervals that may still overlap the current or a
//! later query. Entries arrive in database order (start-sorted) but expire by
//! end position, so eviction is a linear filter over the whole cache rather
//! than a head advance.

use crate::interval::Interval;

/// Database intervals still "in play" for the current query chromosome.
///
/// # Memory Complexity
///
/// O(k) where k = max number of database intervals whose span covers a
/// query start. Pruning runs on every query, so nothing behind the sweep
/// survives past the next scan.
#[derive(Debug)]
pub struct ActiveCache {
    entries: Vec<Interval>,
    /// Maximum observed size (for statistics).
    max_active: usize,
}

impl Default for ActiveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new cache with specified initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            max_active: 0,
        }
    }

    /// Append a database interval.
    #[inline]
    pub fn push(&mut self, interval: Interval) {
        self.entries.push(interval);
        if self.entries.len() > self.max_active {
            self.max_active = self.entries.len();
        }
    }

    /// Evict everything `query` has passed or that sits on another chromosome,
    /// then count the survivors that overlap it.
    ///
    /// After this call every entry satisfies `entry.chrom == query.chrom` and
    /// `query.start < entry.end`. Survivor order is preserved.
    pub fn scan(&mut self, query: &Interval) -> usize {
        self.entries
            .retain(|entry| entry.chrom == query.chrom && !query.is_after(entry));
        self.entries
            .iter()
            .filter(|entry| query.overlap_amount(entry) > 0)
            .count()
    }

    /// Number of cached intervals.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (chromosome change).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the maximum cache size observed (for statistics).
    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Iterator over cached intervals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_counts_and_keeps_overlaps() {
        let mut cache = ActiveCache::new();
        cache.push(Interval::new("chr1", 100, 200));
        cache.push(Interval::new("chr1", 150, 250));
        cache.push(Interval::new("chr1", 300, 400));

        assert_eq!(cache.scan(&Interval::new("chr1", 175, 225)), 2);
        assert_eq!(cache.len(), 3); // Nothing is behind 175
    }

    #[test]
    fn test_scan_evicts_passed_entries() {
        let mut cache = ActiveCache::new();
        cache.push(Interval::new("chr1", 100, 500));
        cache.push(Interval::new("chr1", 150, 200));
        cache.push(Interval::new("chr1", 160, 210));

        // Query starts at 200: [150,200) is behind, [160,210) is not
        let hits = cache.scan(&Interval::new("chr1", 200, 300));
        assert_eq!(hits, 2);
        let left: Vec<_> = cache.iter().map(|i| (i.start, i.end)).collect();
        assert_eq!(left, vec![(100, 500), (160, 210)]);
    }

    #[test]
    fn test_scan_book_ended_kept_but_not_counted() {
        let mut cache = ActiveCache::new();
        cache.push(Interval::new("chr1", 250, 300));

        // Query ends where the entry starts
        assert_eq!(cache.scan(&Interval::new("chr1", 200, 250)), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scan_drops_other_chromosomes() {
        let mut cache = ActiveCache::new();
        cache.push(Interval::new("chr1", 100, 200));
        cache.push(Interval::new("chr2", 100, 200));

        assert_eq!(cache.scan(&Interval::new("chr2", 150, 160)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.iter().next().unwrap().chrom, "chr2");
    }

    #[test]
    fn test_max_active_survives_clear() {
        let mut cache = ActiveCache::new();
        cache.push(Interval::new("chr1", 1, 2));
        cache.push(Interval::new("chr1", 1, 3));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.max_active(), 2);
    }
}
