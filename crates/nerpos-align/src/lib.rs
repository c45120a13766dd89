pub mod align;
pub mod config;
pub mod normalize;
pub mod result;
pub mod similarity;
pub mod split;
pub mod worker;

pub use align::Aligner;
pub use config::{AlignConfig, AlignMode};
pub use result::*;
pub use worker::{AlignEngine, AlignStats, BatchAlignment, SentenceAlignment};
