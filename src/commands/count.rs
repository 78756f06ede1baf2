//! Count command: per-query-interval overlap counts against a database file.
//!
//! Two execution paths share the same engine:
//!
//! - **Streaming** (default): one sweep over both files, handling
//!   chromosome changes inside the engine. Needs no side files.
//! - **Indexed**: builds (or loads) `<file>.idx` for both inputs and sweeps
//!   one chromosome at a time, seeking directly to each block.
//!
//! Output is one line per query interval: the query record, a tab, the count.
//!
//! REQUIREMENT: Both files must be sorted by (chrom, start) in the same
//! chromosome order the command is configured with.

use crate::bed::{BedReader, Result};
use crate::config::{self, ChromOrder};
use crate::indexed::IndexedSweep;
use crate::streaming::HitWriter;
use crate::sweep::{SweepEngine, SweepStats};
use std::io::Write;
use std::path::Path;

/// Count command configuration.
#[derive(Debug, Clone)]
pub struct CountCommand {
    /// Sweep chromosome by chromosome using `.idx` side files
    pub indexed: bool,
    /// Rebuild side files even if they exist (indexed mode)
    pub reindex: bool,
    /// Chromosome order both inputs are sorted in
    pub order: ChromOrder,
}

impl Default for CountCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CountCommand {
    pub fn new() -> Self {
        Self {
            indexed: false,
            reindex: false,
            order: config::chrom_order(),
        }
    }

    /// Run the count over two BED files, writing hit lines to `output`.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        query_path: P,
        database_path: P,
        output: &mut W,
    ) -> Result<SweepStats> {
        let mut writer = HitWriter::new(output);
        let engine = SweepEngine::with_order(self.order);

        let stats = if self.indexed {
            IndexedSweep::with_engine(engine).run_paths(
                query_path,
                database_path,
                self.reindex,
                &mut writer,
            )?
        } else {
            let query = BedReader::from_path(query_path)?;
            let database = BedReader::from_path(database_path)?;
            engine.run(query, database, &mut writer)?
        };

        writer.flush()?;
        Ok(stats)
    }
}
