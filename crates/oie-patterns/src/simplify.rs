//! Pattern simplification
//!
//! Rewrites every atom of a pattern into a more general canonical form and
//! folds observations with the same canonical form into one count.

use rayon::prelude::*;
use tracing::{debug, info};

use oie_core::{Observation, Result, SimplifyConfig, SimplifyMode};

use crate::atom::{parse_positions, Atom, HEADER_LEN, WILDCARD};
use crate::node::PatternNode;
use crate::table::PatternTable;

/// Canonical patterns and the number of observations folded into them
#[derive(Debug, Clone, Default)]
pub struct SimplifiedPatterns {
    pub table: PatternTable,
    pub total: u64,
}

/// Rewrites patterns into canonical form
#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    config: SimplifyConfig,
}

impl Simplifier {
    pub fn new(config: SimplifyConfig) -> Self {
        Self { config }
    }

    /// Simplify a pattern tree, depth first
    pub fn simplify(&self, node: &PatternNode) -> PatternNode {
        match node {
            PatternNode::Atom(atom) => PatternNode::Atom(self.simplify_atom(atom)),
            PatternNode::Edge(children) => {
                PatternNode::Edge(children.iter().map(|c| self.simplify(c)).collect())
            }
        }
    }

    /// Parse a tree-string and simplify it
    pub fn simplify_str(&self, pattern: &str) -> Result<PatternNode> {
        Ok(self.simplify(&PatternNode::parse(pattern)?))
    }

    /// Simplify a single atom
    ///
    /// Atoms no longer than the header are left alone, as are atoms without
    /// a recognised type tag.
    pub fn simplify_atom(&self, atom: &Atom) -> Atom {
        if atom.len() <= HEADER_LEN {
            return atom.clone();
        }
        let Some(atom_type) = atom.type_tag() else {
            return atom.clone();
        };

        if atom_type.is_simplifiable() {
            return match self.config.mode {
                SimplifyMode::Strict => Atom::compose(WILDCARD, atom_type, "", None),
                SimplifyMode::Loose => Atom::compose(WILDCARD, atom_type, atom.subtype(), None),
            };
        }

        if self.config.brace_roles && atom_type.has_roles() {
            if let Some(roles) = atom.role_set() {
                match parse_positions(roles) {
                    Ok(mut positions) => {
                        positions.sort_unstable();
                        let roles: String = positions.iter().map(ToString::to_string).collect();
                        return Atom::compose(atom.text(), atom_type, atom.subtype(), Some(&roles));
                    }
                    Err(reason) => debug!("keeping roles of {} as they are: {}", atom, reason),
                }
            }
        }

        atom.clone()
    }

    /// Simplify every observation and sum counts by canonical form
    ///
    /// Patterns are rewritten in parallel; results are folded in input order
    /// so the table keeps first-seen order and the first invalid observation
    /// is the one reported.
    pub fn simplify_observations(
        &self,
        observations: &[Observation],
    ) -> Result<SimplifiedPatterns> {
        let rewritten: Vec<Result<(String, u64)>> = observations
            .par_iter()
            .map(|obs| -> Result<(String, u64)> {
                obs.validate()?;
                let simplified = self.simplify_str(&obs.pattern)?.to_string();
                debug!("convert {} into {}", obs.pattern, simplified);
                Ok((simplified, obs.count))
            })
            .collect();
        let canonical = rewritten.into_iter().collect::<Result<Vec<_>>>()?;

        let mut result = SimplifiedPatterns::default();
        for (pattern, count) in canonical {
            result.table.add(pattern, count);
            result.total += count;
        }

        info!(
            observations = observations.len(),
            patterns = result.table.len(),
            total = result.total,
            mode = %self.config.mode,
            "simplified patterns"
        );
        Ok(result)
    }
}
