//! Pattern tree model
//!
//! A pattern is an atom or an edge of ordered children. The first child of
//! an edge is usually the connector, the rest are its arguments.

use std::str::FromStr;

use oie_core::{OieError, Result};

use crate::atom::Atom;
use crate::split::split_top_level;

/// A node of a pattern tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternNode {
    Atom(Atom),
    Edge(Vec<PatternNode>),
}

impl PatternNode {
    pub fn atom(label: impl Into<String>) -> Self {
        Self::Atom(Atom::new(label))
    }

    pub fn edge(children: Vec<PatternNode>) -> Self {
        Self::Edge(children)
    }

    /// Parse a tree-string, checking that its brackets balance
    ///
    /// Surrounding whitespace and repeated separators are dropped, so the
    /// rendering of the result is the canonical form of `pattern`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(OieError::malformed_pattern(pattern, "empty pattern"));
        }
        check_brackets(pattern)?;
        Self::parse_balanced(pattern)
    }

    fn parse_balanced(token: &str) -> Result<Self> {
        if !token.starts_with('(') {
            return Atom::parse(token).map(Self::Atom);
        }
        if closing_index(token) != Some(token.len() - 1) {
            return Err(OieError::malformed_pattern(
                token,
                "content after the closing `)`",
            ));
        }

        let children = split_top_level(token)
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| Self::parse_balanced(t))
            .collect::<Result<Vec<_>>>()?;

        if children.is_empty() {
            return Err(OieError::malformed_pattern(token, "empty edge"));
        }
        Ok(Self::Edge(children))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(atom) => Some(atom),
            Self::Edge(_) => None,
        }
    }

    pub fn children(&self) -> &[PatternNode] {
        match self {
            Self::Atom(_) => &[],
            Self::Edge(children) => children,
        }
    }

    /// Number of top-level elements, 1 for an atom
    pub fn arity(&self) -> usize {
        match self {
            Self::Atom(_) => 1,
            Self::Edge(children) => children.len(),
        }
    }

    /// Nesting depth, 0 for an atom
    pub fn depth(&self) -> usize {
        match self {
            Self::Atom(_) => 0,
            Self::Edge(children) => 1 + children.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// All atoms in left-to-right order
    pub fn atoms(&self) -> Vec<&Atom> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a Atom>) {
        match self {
            Self::Atom(atom) => out.push(atom),
            Self::Edge(children) => children.iter().for_each(|c| c.collect_atoms(out)),
        }
    }
}

impl std::fmt::Display for PatternNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atom(atom) => write!(f, "{atom}"),
            Self::Edge(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for PatternNode {
    type Err = OieError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Verify that `(`/`)` and `[`/`]` pairs nest properly
fn check_brackets(pattern: &str) -> Result<()> {
    let mut stack = Vec::new();
    for ch in pattern.chars() {
        match ch {
            '(' | '[' => stack.push(ch),
            ')' | ']' => {
                let expected = if ch == ')' { '(' } else { '[' };
                if stack.pop() != Some(expected) {
                    return Err(OieError::malformed_pattern(
                        pattern,
                        format!("unexpected `{ch}`"),
                    ));
                }
            }
            _ => {}
        }
    }
    match stack.last() {
        Some(open) => Err(OieError::malformed_pattern(
            pattern,
            format!("unclosed `{open}`"),
        )),
        None => Ok(()),
    }
}

/// Byte index of the bracket closing the one at index 0
fn closing_index(token: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in token.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let node = PatternNode::parse("(*/Pd.so (*/M */C) */C)").unwrap();
        assert_eq!(node.arity(), 3);
        assert_eq!(node.depth(), 2);
        assert_eq!(
            node.children()[1],
            PatternNode::edge(vec![PatternNode::atom("*/M"), PatternNode::atom("*/C")])
        );
        assert_eq!(node.atoms().len(), 4);
    }

    #[test]
    fn test_round_trip() {
        for pattern in [
            "(P1/C[xy] A/Cx)",
            "((*/M */Pd.{so}) */C (*/B.ma */C */C))",
            "*/C",
            "(a)",
        ] {
            let node: PatternNode = pattern.parse().unwrap();
            assert_eq!(node.to_string(), pattern);
        }
    }

    #[test]
    fn test_parse_normalizes_whitespace() {
        let node = PatternNode::parse("  (a  (b c)  d) ").unwrap();
        assert_eq!(node.to_string(), "(a (b c) d)");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for pattern in ["", "(a b", "(a b))", "(a [b c)", "(a b)(c)", "()", "(a ])"] {
            assert!(
                PatternNode::parse(pattern).is_err(),
                "`{pattern}` should be rejected"
            );
        }
    }

    #[test]
    fn test_atom_accessors() {
        let node = PatternNode::atom("*/C");
        assert!(node.is_atom());
        assert_eq!(node.arity(), 1);
        assert_eq!(node.depth(), 0);
        assert!(node.children().is_empty());
        assert_eq!(node.as_atom().map(Atom::as_str), Some("*/C"));
    }
}
