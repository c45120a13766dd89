pub mod assemble;
pub mod record;

pub use assemble::{assemble, assemble_batch, Assembly};
pub use record::{MergedRecord, UnmatchedRecord, NULL_MARKER};
