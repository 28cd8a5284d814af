//! OIE Patterns - Pattern generalization and compression
//!
//! Turns observed extraction patterns, rendered as bracketed tree-strings,
//! into a compact set of generalized patterns:
//! - Parsing tree-strings into typed pattern trees
//! - Simplifying atoms to a canonical, more general form
//! - Merging near-duplicate patterns into `[xy]` character-class patterns

use oie_core::{PatternCount, Result};

pub mod atom;
pub mod compare;
pub mod compress;
pub mod node;
pub mod pipeline;
pub mod simplify;
pub mod split;
pub mod table;

pub use atom::{Atom, AtomType, Position};
pub use compare::{compare, compare_str, MergeOutcome, NoMergeReason};
pub use compress::{compressor_for, FixpointCompressor, GreedyCompressor};
pub use node::PatternNode;
pub use pipeline::{generalise, PatternPipeline};
pub use simplify::{SimplifiedPatterns, Simplifier};
pub use split::split_top_level;
pub use table::PatternTable;

/// Trait for pattern compressors
pub trait PatternCompressor: Send + Sync {
    fn compress(&self, patterns: &[PatternCount]) -> Result<PatternTable>;
}
