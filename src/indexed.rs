//! Indexed sweep: one engine run per query chromosome, seeking both files.
//!
//! Each query chromosome block is paired with the database block of the
//! same name, looked up in the database's own index. A chromosome the
//! database lacks gets an empty database stream, so every query on it
//! reports zero. Each run is bounded by record counts rather than by
//! watching chromosome labels, and starts with a fresh cache.

use crate::bed::{BedError, BedReader, Bounded, Result, SeekableStream};
use crate::index::ChromIndex;
use crate::streaming::HitSink;
use crate::sweep::{SweepEngine, SweepStats};
use std::path::Path;

/// Drives [`SweepEngine`] chromosome by chromosome.
#[derive(Debug, Clone, Default)]
pub struct IndexedSweep {
    pub engine: SweepEngine,
}

impl IndexedSweep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: SweepEngine) -> Self {
        Self { engine }
    }

    /// Sweep every chromosome in `query_index`, in index order.
    ///
    /// Both streams are repositioned before each chromosome; between runs
    /// they belong to this driver, during a run to the engine.
    pub fn run<Q, D, S>(
        &self,
        query: &mut Q,
        query_index: &ChromIndex,
        database: &mut D,
        database_index: &ChromIndex,
        mut sink: S,
    ) -> Result<SweepStats>
    where
        Q: SeekableStream,
        D: SeekableStream,
        S: HitSink,
    {
        let mut total = SweepStats::default();

        for entry in query_index.entries() {
            query.seek(entry.start_offset)?;
            let query_block = Bounded::new(&mut *query, entry.record_count);

            let db_range = database_index.block(&entry.chrom);
            let database_block = if db_range.is_empty() {
                Bounded::empty(&mut *database)
            } else {
                database.seek(db_range.start_offset)?;
                Bounded::new(&mut *database, db_range.record_count)
            };

            let stats = self
                .engine
                .run(query_block, database_block, &mut sink)?;
            log::debug!("{}: {}", entry.chrom, stats);
            total += stats;
        }

        Ok(total)
    }

    /// Sweep two BED files, loading or building their `.idx` side files.
    ///
    /// With `reindex`, both indexes are rebuilt even if present. A source
    /// without records contributes an empty index.
    pub fn run_paths<P: AsRef<Path>, S: HitSink>(
        &self,
        query_path: P,
        database_path: P,
        reindex: bool,
        sink: S,
    ) -> Result<SweepStats> {
        let query_index = load_index(query_path.as_ref(), reindex)?;
        let database_index = load_index(database_path.as_ref(), reindex)?;

        let mut query = BedReader::from_path(query_path)?;
        let mut database = BedReader::from_path(database_path)?;

        self.run(
            &mut query,
            &query_index,
            &mut database,
            &database_index,
            sink,
        )
    }
}

fn load_index(source: &Path, reindex: bool) -> Result<ChromIndex> {
    let result = if reindex {
        ChromIndex::rebuild(source)
    } else {
        ChromIndex::load_or_build(source)
    };
    match result {
        Err(BedError::EmptySource(path)) => {
            log::warn!("{} has no records", path.display());
            Ok(ChromIndex::new())
        }
        other => other,
    }
}
