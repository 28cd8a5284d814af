//! Structural comparison and merging of two patterns
//!
//! Two patterns merge when they have the same shape and every pair of
//! differing atoms shares its header and prefix, with the remaining
//! characters differing in at most two values per position. Differing
//! positions become `[xy]` alternations.

use tracing::debug;

use oie_core::{OieError, Result};

use crate::atom::{Atom, Position, HEADER_LEN};
use crate::node::PatternNode;

/// Why two patterns could not be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMergeReason {
    /// Edges with different numbers of children
    ArityMismatch { left: usize, right: usize },
    /// An atom aligned with an edge
    ShapeMismatch,
    /// Atoms of a different kind
    HeaderMismatch,
    /// Atoms whose verbatim prefix differs
    PrefixMismatch,
    /// Atoms with a different number of positions past the prefix
    LengthMismatch,
    /// A position would need more than two characters
    AlternationFull,
}

impl std::fmt::Display for NoMergeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArityMismatch { left, right } => {
                write!(f, "patterns have unequal length ({left} vs {right})")
            }
            Self::ShapeMismatch => write!(f, "an atom is aligned with a sub-pattern"),
            Self::HeaderMismatch => write!(f, "atoms have different headers"),
            Self::PrefixMismatch => write!(f, "atoms have different prefixes"),
            Self::LengthMismatch => write!(f, "atoms have different lengths"),
            Self::AlternationFull => write!(f, "alternation would exceed two characters"),
        }
    }
}

/// Result of comparing two patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged(PatternNode),
    NoMerge(NoMergeReason),
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    pub fn merged(self) -> Option<PatternNode> {
        match self {
            Self::Merged(node) => Some(node),
            Self::NoMerge(_) => None,
        }
    }
}

/// Compare two patterns and merge them if they differ only locally
///
/// Errors are reserved for contract violations, such as an atom too short
/// to have a header where one must be compared.
pub fn compare(left: &PatternNode, right: &PatternNode) -> Result<MergeOutcome> {
    if left == right {
        return Ok(MergeOutcome::Merged(left.clone()));
    }

    match (left, right) {
        (PatternNode::Edge(lc), PatternNode::Edge(rc)) => {
            if lc.len() != rc.len() {
                return Ok(MergeOutcome::NoMerge(NoMergeReason::ArityMismatch {
                    left: lc.len(),
                    right: rc.len(),
                }));
            }

            let mut merged = Vec::with_capacity(lc.len());
            for (l, r) in lc.iter().zip(rc) {
                if !l.is_atom() && l != r {
                    debug!("recursion needed for {} and {}", l, r);
                }
                match compare(l, r)? {
                    MergeOutcome::Merged(node) => merged.push(node),
                    no_merge => return Ok(no_merge),
                }
            }
            Ok(MergeOutcome::Merged(PatternNode::Edge(merged)))
        }
        (PatternNode::Atom(l), PatternNode::Atom(r)) => merge_atoms(l, r),
        _ => Ok(MergeOutcome::NoMerge(NoMergeReason::ShapeMismatch)),
    }
}

/// Parse both tree-strings and [`compare`] them
pub fn compare_str(left: &str, right: &str) -> Result<MergeOutcome> {
    compare(&PatternNode::parse(left)?, &PatternNode::parse(right)?)
}

fn merge_atoms(left: &Atom, right: &Atom) -> Result<MergeOutcome> {
    let (Some(lh), Some(rh)) = (left.header(), right.header()) else {
        let short = if left.header().is_none() { left } else { right };
        return Err(OieError::AtomTooShort {
            atom: short.to_string(),
            min: HEADER_LEN,
        });
    };
    if lh != rh {
        return Ok(MergeOutcome::NoMerge(NoMergeReason::HeaderMismatch));
    }

    let (prefix, _) = left.split_prefix();
    if prefix != right.split_prefix().0 {
        return Ok(MergeOutcome::NoMerge(NoMergeReason::PrefixMismatch));
    }

    let (lt, rt) = (left.tail_positions()?, right.tail_positions()?);
    if lt.len() != rt.len() {
        return Ok(MergeOutcome::NoMerge(NoMergeReason::LengthMismatch));
    }

    let Some(positions) = lt
        .iter()
        .zip(&rt)
        .map(|(l, r)| l.merge(*r))
        .collect::<Option<Vec<Position>>>()
    else {
        return Ok(MergeOutcome::NoMerge(NoMergeReason::AlternationFull));
    };

    let mut label = prefix.to_string();
    for position in &positions {
        label.push_str(&position.to_string());
    }
    debug!("atoms {} and {} were compressed into {}", left, right, label);
    Ok(MergeOutcome::Merged(PatternNode::Atom(Atom::new(label))))
}
