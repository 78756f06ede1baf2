//! Shared streaming components for the sweep.
//!
//! - Zero-allocation BED field parsing
//! - The active cache of in-play database intervals
//! - Hit count output
//!
//! The sweep keeps O(k) memory where k = database intervals spanning a query start.

pub mod active_set;
pub mod buffers;
pub mod output;
pub mod parsing;

pub use active_set::ActiveCache;
pub use output::{HitSink, HitWriter};
pub use parsing::{parse_bed3_fields, parse_u64_fast, should_skip_line, Bed3Fields};
