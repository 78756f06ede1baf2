//! Chromosome sweep: single-pass overlap counting between two sorted streams.
//!
//! # Algorithm
//!
//! Both inputs are sorted by (chrom, start). For every query interval:
//! 1. Bring the two cursors onto the same chromosome, fast-forwarding
//!    whichever side lags (see [`SweepEngine::synchronize`]).
//! 2. Scan the active cache: evict database intervals the query has passed
//!    (`query.start >= db.end`) and count the ones it overlaps.
//! 3. Advance the database while its next interval starts before the query
//!    ends, counting overlaps and adding each interval to the cache.
//! 4. Report the count and move to the next query.
//!
//! Database intervals left over when the query runs out are never read.
//!
//! # Memory Complexity
//!
//! O(k) where k = database intervals whose span covers a query start.
//!
//! # Requirements
//!
//! Both inputs MUST be sorted by chromosome under the engine's
//! [`ChromOrder`], then by start. Nothing is validated: unsorted input
//! silently undercounts.

use std::cmp::Ordering;
use std::fmt;
use std::ops::AddAssign;

use crate::bed::{IntervalStream, Result};
use crate::config::{self, ChromOrder};
use crate::interval::BedRecord;
use crate::streaming::{ActiveCache, HitSink};

/// Counters from one or more sweeps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Number of query intervals reported
    pub query_intervals: usize,
    /// Number of database intervals read
    pub database_intervals: usize,
    /// Sum of all reported hit counts
    pub hits: usize,
    /// Maximum size of the active cache (memory high-water mark)
    pub max_active: usize,
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, other: Self) {
        self.query_intervals += other.query_intervals;
        self.database_intervals += other.database_intervals;
        self.hits += other.hits;
        self.max_active = self.max_active.max(other.max_active);
    }
}

impl fmt::Display for SweepStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query intervals: {}, Database intervals: {}, Hits: {}, Max active: {}",
            self.query_intervals, self.database_intervals, self.hits, self.max_active
        )
    }
}

/// The merge-join core.
///
/// Holds only configuration; every [`run`](Self::run) starts with a fresh
/// cache and accumulator.
#[derive(Debug, Clone)]
pub struct SweepEngine {
    /// Order the inputs were sorted with.
    pub order: ChromOrder,
}

impl Default for SweepEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-run mutable state, threaded through each step.
struct SweepState {
    cache: ActiveCache,
    stats: SweepStats,
}

/// Where synchronization left the query cursor.
enum Synced {
    /// Cursors agree (or the database is exhausted); continue with this query.
    Ready(BedRecord),
    /// The query stream ran out while draining.
    Exhausted,
}

impl SweepEngine {
    /// Engine using the process-wide chromosome order.
    pub fn new() -> Self {
        Self::with_order(config::chrom_order())
    }

    pub fn with_order(order: ChromOrder) -> Self {
        Self { order }
    }

    /// Sweep `query` against `database`, reporting one count per query
    /// interval to `sink` in query order.
    pub fn run<Q, D, S>(&self, mut query: Q, mut database: D, mut sink: S) -> Result<SweepStats>
    where
        Q: IntervalStream,
        D: IntervalStream,
        S: HitSink,
    {
        let mut state = SweepState {
            cache: ActiveCache::new(),
            stats: SweepStats::default(),
        };

        let mut curr_query = query.read_next()?;
        let mut curr_db = self.next_db(&mut database, &mut state)?;

        while let Some(q) = curr_query {
            let q = match self.synchronize(q, &mut curr_db, &mut query, &mut database, &mut sink, &mut state)? {
                Synced::Ready(q) => q,
                Synced::Exhausted => break,
            };

            let mut hits = state.cache.scan(&q.interval);

            while let Some(db) = curr_db.take() {
                if db.chrom() != q.chrom() || db.interval.is_after(&q.interval) {
                    curr_db = Some(db);
                    break;
                }
                if q.interval.overlap_amount(&db.interval) > 0 {
                    hits += 1;
                }
                state.cache.push(db.interval);
                curr_db = self.next_db(&mut database, &mut state)?;
            }

            Self::report(&mut sink, &mut state, &q, hits)?;
            curr_query = query.read_next()?;
        }

        state.stats.max_active = state.cache.max_active();
        Ok(state.stats)
    }

    /// Move the cursors onto a common chromosome.
    ///
    /// - Database exhausted: nothing to do; the cache may still hold hits.
    /// - Query ahead: skip database records until the database catches up,
    ///   emptying the cache.
    /// - Database ahead: the query chromosome has no more database records.
    ///   First every remaining query on that chromosome is scanned against
    ///   the leftover cache (it can still hit), then queries on chromosomes
    ///   that also sort before the database's report zero without a scan.
    ///
    /// Loops until the cursors agree, since the database may overshoot and
    /// the drained query may land on either side of it.
    fn synchronize<Q, D, S>(
        &self,
        mut q: BedRecord,
        curr_db: &mut Option<BedRecord>,
        query: &mut Q,
        database: &mut D,
        sink: &mut S,
        state: &mut SweepState,
    ) -> Result<Synced>
    where
        Q: IntervalStream,
        D: IntervalStream,
        S: HitSink,
    {
        loop {
            let db_chrom = match curr_db.as_ref() {
                Some(db) if db.chrom() != q.chrom() => db.chrom().to_owned(),
                _ => return Ok(Synced::Ready(q)),
            };

            match self.order.compare(q.chrom(), &db_chrom) {
                Ordering::Greater => {
                    while let Some(db) = curr_db.as_ref() {
                        if self.order.compare(db.chrom(), q.chrom()) != Ordering::Less {
                            break;
                        }
                        *curr_db = self.next_db(database, state)?;
                    }
                    state.cache.clear();
                }
                Ordering::Less | Ordering::Equal => {
                    // Stage 1: finish this chromosome against the cache.
                    let chrom = q.chrom().to_owned();
                    loop {
                        let hits = state.cache.scan(&q.interval);
                        Self::report(sink, state, &q, hits)?;
                        match query.read_next()? {
                            Some(next) if next.chrom() == chrom => q = next,
                            Some(next) => {
                                q = next;
                                break;
                            }
                            None => return Ok(Synced::Exhausted),
                        }
                    }
                    state.cache.clear();

                    // Stage 2: chromosomes absent from the database.
                    while self.order.compare(q.chrom(), &db_chrom) == Ordering::Less {
                        Self::report(sink, state, &q, 0)?;
                        match query.read_next()? {
                            Some(next) => q = next,
                            None => return Ok(Synced::Exhausted),
                        }
                    }
                }
            }
        }
    }

    #[inline]
    fn next_db<D: IntervalStream>(
        &self,
        database: &mut D,
        state: &mut SweepState,
    ) -> Result<Option<BedRecord>> {
        let next = database.read_next()?;
        if next.is_some() {
            state.stats.database_intervals += 1;
        }
        Ok(next)
    }

    #[inline]
    fn report<S: HitSink>(
        sink: &mut S,
        state: &mut SweepState,
        query: &BedRecord,
        hits: usize,
    ) -> Result<()> {
        state.stats.query_intervals += 1;
        state.stats.hits += hits;
        sink.report(query, hits)
    }
}

/// Brute-force O(Q·D) reference: count `overlap_amount > 0` pairs.
///
/// Only meant for checking the sweep on small inputs.
pub fn count_overlaps_naive(query: &[BedRecord], database: &[BedRecord]) -> Vec<usize> {
    query
        .iter()
        .map(|q| {
            database
                .iter()
                .filter(|db| q.interval.overlap_amount(&db.interval) > 0)
                .count()
        })
        .collect()
}
