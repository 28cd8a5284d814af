//! Bracket-aware splitting of tree-strings
//!
//! `(` and `[` open a group, `)` and `]` close one. A space separates tokens
//! only outside every group, so sub-patterns and `[xy]` alternations stay
//! whole.

use tracing::debug;

/// Split the body of a tree-string into its top-level tokens
///
/// One layer of outer delimiters is stripped unconditionally. Brackets are
/// not validated: unbalanced input yields a degenerate split rather than an
/// error. Use [`crate::PatternNode::parse`] for checked parsing.
pub fn split_top_level(pattern: &str) -> Vec<String> {
    let mut chars = pattern.chars();
    chars.next();
    chars.next_back();
    let body = chars.as_str();

    let mut tokens = Vec::new();
    let mut depth: i32 = 0;
    let mut current = String::new();

    for ch in body.chars() {
        match ch {
            ' ' if depth == 0 => tokens.push(std::mem::take(&mut current)),
            '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    debug!("split {} into {:?}", pattern, tokens);
    tokens
}
