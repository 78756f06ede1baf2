//! Command implementations for chromsweep.

pub mod count;
pub mod index;

pub use count::CountCommand;
pub use index::IndexCommand;
