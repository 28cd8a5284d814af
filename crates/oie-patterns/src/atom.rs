//! Pattern atoms
//!
//! An atom is laid out `text/TypeSubtype.roles.extra/namespace`, for example
//! `*/Pd.so.|f--3s-/en`. The text may be the wildcard `*`, and merged atoms
//! may carry `[xy]` alternations past their four-character prefix.

use oie_core::{OieError, Result};

/// Characters that identify an atom's kind; atoms differing here never merge
pub const HEADER_LEN: usize = 3;

/// Characters copied verbatim into a merged atom
pub const PREFIX_LEN: usize = 4;

/// Text of a fully generalized atom
pub const WILDCARD: &str = "*";

// ============================================================================
// Atom Types
// ============================================================================

/// Semantic class of an atom, the first character after `/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomType {
    Concept,
    Predicate,
    Modifier,
    Builder,
    Trigger,
    Conjunction,
    Relation,
    Specifier,
}

impl AtomType {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(Self::Concept),
            'P' => Some(Self::Predicate),
            'M' => Some(Self::Modifier),
            'B' => Some(Self::Builder),
            'T' => Some(Self::Trigger),
            'J' => Some(Self::Conjunction),
            'R' => Some(Self::Relation),
            'S' => Some(Self::Specifier),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Concept => 'C',
            Self::Predicate => 'P',
            Self::Modifier => 'M',
            Self::Builder => 'B',
            Self::Trigger => 'T',
            Self::Conjunction => 'J',
            Self::Relation => 'R',
            Self::Specifier => 'S',
        }
    }

    /// Types whose detail is dropped by the simplifier
    pub fn is_simplifiable(self) -> bool {
        matches!(self, Self::Concept | Self::Relation | Self::Specifier)
    }

    /// Types that carry argument roles
    pub fn has_roles(self) -> bool {
        matches!(self, Self::Predicate | Self::Builder)
    }
}

impl std::fmt::Display for AtomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Character Positions
// ============================================================================

/// One character position of an atom: a literal or a two-way alternation
///
/// Ordering puts literals before alternations, each by character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    Literal(char),
    Alternation(char, char),
}

impl Position {
    /// Alternation with its characters in ascending order
    pub fn alternation(a: char, b: char) -> Self {
        if a <= b {
            Self::Alternation(a, b)
        } else {
            Self::Alternation(b, a)
        }
    }

    fn normalized(self) -> Self {
        match self {
            Self::Alternation(a, b) => Self::alternation(a, b),
            literal => literal,
        }
    }

    /// Combine two positions, `None` if that needs more than two characters
    pub fn merge(self, other: Self) -> Option<Self> {
        match (self.normalized(), other.normalized()) {
            (a, b) if a == b => Some(a),
            (Self::Literal(a), Self::Literal(b)) => Some(Self::alternation(a, b)),
            (alt @ Self::Alternation(a, b), Self::Literal(c))
            | (Self::Literal(c), alt @ Self::Alternation(a, b))
                if c == a || c == b =>
            {
                Some(alt)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(c) => write!(f, "{c}"),
            Self::Alternation(a, b) => write!(f, "[{a}{b}]"),
        }
    }
}

/// Parse `x[yz]w` into positions, alternations in ascending order
pub(crate) fn parse_positions(s: &str) -> std::result::Result<Vec<Position>, &'static str> {
    let mut chars = s.chars();
    let mut positions = Vec::new();

    while let Some(ch) = chars.next() {
        match ch {
            '[' => match (chars.next(), chars.next(), chars.next()) {
                (Some(a), Some(b), Some(']')) if !is_bracket(a) && !is_bracket(b) => {
                    positions.push(Position::alternation(a, b))
                }
                _ => return Err("alternation must hold exactly two characters"),
            },
            ']' => return Err("unmatched `]`"),
            _ => positions.push(Position::Literal(ch)),
        }
    }

    Ok(positions)
}

fn is_bracket(ch: char) -> bool {
    matches!(ch, '[' | ']')
}

// ============================================================================
// Atom
// ============================================================================

/// A leaf token of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    label: String,
}

impl Atom {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Create an atom from a token, rejecting empty or whitespace-bearing labels
    pub fn parse(label: &str) -> Result<Self> {
        if label.is_empty() {
            return Err(OieError::malformed_atom(label, "empty atom"));
        }
        if label.chars().any(char::is_whitespace) {
            return Err(OieError::malformed_atom(label, "atoms cannot contain whitespace"));
        }
        Ok(Self::new(label))
    }

    /// Assemble `text/TypeSubtype`, optionally followed by `.{roles}`
    pub fn compose(text: &str, atom_type: AtomType, subtype: &str, roles: Option<&str>) -> Self {
        let mut label = format!("{text}/{}{subtype}", atom_type.code());
        if let Some(roles) = roles {
            label.push_str(".{");
            label.push_str(roles);
            label.push('}');
        }
        Self { label }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.label.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    /// Literal payload before the first `/`
    pub fn text(&self) -> &str {
        match self.label.split_once('/') {
            Some((text, _)) => text,
            None => &self.label,
        }
    }

    /// Type code with its role and extra segments, e.g. `Pd.so.|f--3s-`
    fn type_part(&self) -> Option<&str> {
        let (_, rest) = self.label.split_once('/')?;
        rest.split('/').next()
    }

    /// Type tag plus subtype, e.g. `Pd`
    fn type_segment(&self) -> Option<&str> {
        self.type_part()?.split('.').next()
    }

    pub fn type_tag(&self) -> Option<AtomType> {
        self.type_segment()?.chars().next().and_then(AtomType::from_code)
    }

    /// Subtype marker following the type tag, empty if absent
    pub fn subtype(&self) -> &str {
        let Some(segment) = self.type_segment() else {
            return "";
        };
        let mut chars = segment.chars();
        chars.next();
        chars.as_str()
    }

    /// Argument-role letters of a predicate or builder atom
    ///
    /// Only atoms longer than the header carry a role set. A braced set
    /// (`{so}`) is returned without its braces.
    pub fn role_set(&self) -> Option<&str> {
        if self.len() <= HEADER_LEN || !self.type_tag()?.has_roles() {
            return None;
        }
        let roles = self.type_part()?.split('.').nth(1)?;
        let roles = roles
            .strip_prefix('{')
            .and_then(|r| r.strip_suffix('}'))
            .unwrap_or(roles);
        (!roles.is_empty()).then_some(roles)
    }

    /// First [`HEADER_LEN`] characters, `None` for shorter atoms
    pub fn header(&self) -> Option<&str> {
        match self.label.char_indices().nth(HEADER_LEN) {
            Some((idx, _)) => Some(&self.label[..idx]),
            None if self.len() == HEADER_LEN => Some(&self.label),
            None => None,
        }
    }

    /// Split after [`PREFIX_LEN`] characters
    pub fn split_prefix(&self) -> (&str, &str) {
        let idx = self
            .label
            .char_indices()
            .nth(PREFIX_LEN)
            .map_or(self.label.len(), |(idx, _)| idx);
        self.label.split_at(idx)
    }

    /// Character positions after the prefix
    pub fn tail_positions(&self) -> Result<Vec<Position>> {
        parse_positions(self.split_prefix().1)
            .map_err(|reason| OieError::malformed_atom(&self.label, reason))
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_parts() {
        let atom = Atom::new("is/Pd.so.|f--3s-/en");
        assert_eq!(atom.text(), "is");
        assert_eq!(atom.type_tag(), Some(AtomType::Predicate));
        assert_eq!(atom.subtype(), "d");
        assert_eq!(atom.role_set(), Some("so"));
    }

    #[test]
    fn test_role_set_rules() {
        // Concepts never carry roles
        assert_eq!(Atom::new("*/Cc.s").role_set(), None);
        // Too short for a role set
        assert_eq!(Atom::new("*/P").role_set(), None);
        // No role segment
        assert_eq!(Atom::new("*/Pd").role_set(), None);
        assert_eq!(Atom::new("*/B.{ma}").role_set(), Some("ma"));
    }

    #[test]
    fn test_untyped_atoms() {
        let atom = Atom::new("ARG0");
        assert_eq!(atom.text(), "ARG0");
        assert_eq!(atom.type_tag(), None);
        assert_eq!(atom.subtype(), "");
        assert_eq!(atom.role_set(), None);
    }

    #[test]
    fn test_header_and_prefix() {
        let atom = Atom::new("P1/Cx");
        assert_eq!(atom.header(), Some("P1/"));
        assert_eq!(atom.split_prefix(), ("P1/C", "x"));

        assert_eq!(Atom::new("*/C").header(), Some("*/C"));
        assert_eq!(Atom::new("*/C").split_prefix(), ("*/C", ""));
        assert_eq!(Atom::new("*").header(), None);
    }

    #[test]
    fn test_tail_positions() {
        let atom = Atom::new("P1/C[xy]z");
        assert_eq!(
            atom.tail_positions().unwrap(),
            vec![Position::Alternation('x', 'y'), Position::Literal('z')]
        );
        assert_eq!(
            Atom::new("P1/C[yx]").tail_positions().unwrap(),
            vec![Position::Alternation('x', 'y')]
        );
        assert!(Atom::new("P1/C[xyz]").tail_positions().is_err());
        assert!(Atom::new("P1/Cx]").tail_positions().is_err());
        assert!(Atom::new("P1/C[x").tail_positions().is_err());
    }

    #[test]
    fn test_position_merge() {
        let x = Position::Literal('x');
        let y = Position::Literal('y');
        assert_eq!(x.merge(x), Some(x));
        assert_eq!(y.merge(x), Some(Position::Alternation('x', 'y')));
        assert_eq!(
            Position::Alternation('y', 'x').merge(Position::Alternation('x', 'y')),
            Some(Position::Alternation('x', 'y'))
        );
        // Width is capped at two characters
        assert_eq!(Position::Alternation('x', 'y').merge(Position::Literal('z')), None);
        assert_eq!(
            Position::Alternation('x', 'y').merge(x),
            Some(Position::Alternation('x', 'y'))
        );
    }

    #[test]
    fn test_position_order() {
        let mut positions = parse_positions("[or]sa").unwrap();
        positions.sort_unstable();
        let rendered: String = positions.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, "as[or]");
    }

    #[test]
    fn test_compose() {
        assert_eq!(Atom::compose("*", AtomType::Concept, "", None).as_str(), "*/C");
        assert_eq!(
            Atom::compose("*", AtomType::Predicate, "d", Some("os")).as_str(),
            "*/Pd.{os}"
        );
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        assert!(Atom::parse("a b").is_err());
        assert!(Atom::parse("").is_err());
        assert!(Atom::parse("*/Cc").is_ok());
    }
}
