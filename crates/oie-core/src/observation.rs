//! Boundary data shapes
//!
//! Raw observations come in as `(pattern, count)` pairs, generalized tables
//! go out in the same shape. Files are either a JSON array of objects or
//! plain text lines of the form `count<TAB>pattern`.

use serde::{Deserialize, Serialize};

use crate::{OieError, Result};

/// A raw pattern observation from upstream frequency counting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Parenthesized tree-string
    pub pattern: String,
    /// Number of times the pattern was observed
    pub count: u64,
}

impl Observation {
    pub fn new(pattern: impl Into<String>, count: u64) -> Self {
        Self {
            pattern: pattern.into(),
            count,
        }
    }

    /// Reject observations that cannot have come from a frequency count
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            return Err(OieError::InvalidObservation(
                "pattern must not be empty".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(OieError::InvalidObservation(format!(
                "count for `{}` must be positive",
                self.pattern
            )));
        }
        Ok(())
    }
}

/// A (possibly generalized) pattern with its accumulated count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub pattern: String,
    pub count: u64,
}

impl PatternCount {
    pub fn new(pattern: impl Into<String>, count: u64) -> Self {
        Self {
            pattern: pattern.into(),
            count,
        }
    }
}

impl From<(&str, u64)> for PatternCount {
    fn from((pattern, count): (&str, u64)) -> Self {
        Self::new(pattern, count)
    }
}

impl From<Observation> for PatternCount {
    fn from(obs: Observation) -> Self {
        Self::new(obs.pattern, obs.count)
    }
}

impl std::fmt::Display for PatternCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.count, self.pattern)
    }
}

/// Parse an observation file
///
/// Content starting with `[` is read as JSON, anything else as
/// tab-separated `count<TAB>pattern` lines. Blank lines and lines starting
/// with `#` are skipped.
pub fn parse_observations(content: &str) -> Result<Vec<Observation>> {
    let trimmed = content.trim_start();
    let observations: Vec<Observation> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| OieError::InvalidObservation(format!("invalid JSON: {e}")))?
    } else {
        content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line_no, line)| parse_line(line_no, line))
            .collect::<Result<_>>()?
    };

    for obs in &observations {
        obs.validate()?;
    }
    Ok(observations)
}

fn parse_line(line_no: usize, line: &str) -> Result<Observation> {
    let (count, pattern) = line.split_once('\t').ok_or_else(|| {
        OieError::InvalidObservation(format!("line {line_no}: expected `count<TAB>pattern`"))
    })?;
    let count = count.trim().parse::<u64>().map_err(|_| {
        OieError::InvalidObservation(format!("line {line_no}: invalid count `{}`", count.trim()))
    })?;
    Ok(Observation::new(pattern.trim(), count))
}

/// Render a pattern table as `count<TAB>pattern` lines
pub fn render_table(table: &[PatternCount]) -> String {
    table.iter().map(|pc| format!("{pc}\n")).collect()
}
