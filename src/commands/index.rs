//! Index command: build the `.idx` side file for a sorted BED file.

use crate::bed::Result;
use crate::index::{index_path, ChromIndex};
use std::io::Write;
use std::path::Path;

/// Index command configuration.
#[derive(Debug, Clone, Default)]
pub struct IndexCommand {
    /// Rebuild even if the side file already exists
    pub force: bool,
    /// Print the index table to the output
    pub print: bool,
}

impl IndexCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or load) the index for `source`.
    pub fn run<P: AsRef<Path>, W: Write>(&self, source: P, output: &mut W) -> Result<ChromIndex> {
        let source = source.as_ref();
        let index = if self.force {
            ChromIndex::rebuild(source)?
        } else {
            ChromIndex::load_or_build(source)?
        };

        if self.print {
            index.write(output)?;
            output.flush()?;
        } else {
            log::info!(
                "{}: {} chromosomes, {} records",
                index_path(source).display(),
                index.len(),
                index.record_count()
            );
        }

        Ok(index)
    }
}
