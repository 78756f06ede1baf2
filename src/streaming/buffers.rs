//! Buffer size constants for streaming I/O.

/// Default output buffer size (2 MB).
pub const DEFAULT_OUTPUT_BUFFER: usize = 2 * 1024 * 1024;

/// Default input buffer size (256 KB).
/// Good balance for reading sorted BED files. Seeking discards it, so the
/// indexed sweep refills at most twice per chromosome.
pub const DEFAULT_INPUT_BUFFER: usize = 256 * 1024;

/// Default line buffer capacity (1 KB).
/// Sufficient for most BED lines.
pub const DEFAULT_LINE_BUFFER: usize = 1024;
