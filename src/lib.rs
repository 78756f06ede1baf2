//! chromsweep: single-pass overlap counting between sorted interval files.
//!
//! For every interval of a sorted "query" BED file, report how many
//! intervals of a sorted "database" BED file overlap it, reading each file
//! once, front to back.
//!
//! # Features
//!
//! - **Streaming sweep**: O(k) memory, where k = database intervals spanning a query start
//! - **Chromosome index**: `.idx` side files locate each chromosome block, so
//!   the sweep can seek straight to it
//! - **Strict half-open semantics**: book-ended intervals never count
//!
//! # Example
//!
//! ```rust,no_run
//! use chromsweep::{bed::BedReader, sweep::SweepEngine};
//!
//! let query = BedReader::from_path("query.bed").unwrap();
//! let database = BedReader::from_path("database.bed").unwrap();
//!
//! let mut counts: Vec<usize> = Vec::new();
//! let stats = SweepEngine::new().run(query, database, &mut counts).unwrap();
//! println!("{}", stats);
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod index;
pub mod indexed;
pub mod interval;
pub mod streaming;
pub mod sweep;

// Re-export commonly used types
pub use bed::{BedError, BedReader, IntervalStream, SeekableStream};
pub use index::{ChromIndex, ChromIndexEntry};
pub use indexed::IndexedSweep;
pub use interval::{BedRecord, Interval};
pub use sweep::{SweepEngine, SweepStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{BedError, BedReader, Bounded, IntervalStream, SeekableStream};
    pub use crate::commands::{CountCommand, IndexCommand};
    pub use crate::config::ChromOrder;
    pub use crate::index::{ChromIndex, ChromIndexEntry};
    pub use crate::indexed::IndexedSweep;
    pub use crate::interval::{BedRecord, Interval};
    pub use crate::streaming::{HitSink, HitWriter};
    pub use crate::sweep::{SweepEngine, SweepStats};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_workflow() {
        use crate::bed::BedReader;
        use crate::config::ChromOrder;
        use crate::sweep::SweepEngine;

        let query = "chr1\t100\t200\nchr1\t300\t400\n";
        let database = "chr1\t150\t250\nchr1\t190\t310\n";

        let mut counts: Vec<usize> = Vec::new();
        SweepEngine::with_order(ChromOrder::Lexicographic)
            .run(
                BedReader::new(query.as_bytes()),
                BedReader::new(database.as_bytes()),
                &mut counts,
            )
            .unwrap();

        assert_eq!(counts, vec![2, 1]);
    }
}
