//! Pattern count table
//!
//! Maps a canonical pattern string to its accumulated count. Insertion
//! order is remembered so that equal counts can keep first-seen order.

use indexmap::IndexMap;

use oie_core::{PatternCount, TieBreak};

/// Accumulated counts keyed by canonical pattern string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternTable {
    counts: IndexMap<String, u64>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to the entry for `pattern`, creating it if needed
    pub fn add(&mut self, pattern: impl Into<String>, count: u64) {
        *self.counts.entry(pattern.into()).or_insert(0) += count;
    }

    pub fn get(&self, pattern: &str) -> Option<u64> {
        self.counts.get(pattern).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by descending count
    pub fn sorted(&self, tie_break: TieBreak) -> Vec<PatternCount> {
        let mut entries: Vec<PatternCount> = self
            .iter()
            .map(|(pattern, count)| PatternCount::new(pattern, count))
            .collect();
        sort_counts(&mut entries, tie_break);
        entries
    }

    /// The `n` most frequent entries
    pub fn top(&self, n: usize, tie_break: TieBreak) -> Vec<PatternCount> {
        let mut entries = self.sorted(tie_break);
        entries.truncate(n);
        entries
    }
}

impl FromIterator<PatternCount> for PatternTable {
    fn from_iter<I: IntoIterator<Item = PatternCount>>(iter: I) -> Self {
        let mut table = Self::new();
        for pc in iter {
            table.add(pc.pattern, pc.count);
        }
        table
    }
}

impl<'a> FromIterator<&'a PatternCount> for PatternTable {
    fn from_iter<I: IntoIterator<Item = &'a PatternCount>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

/// Sort by descending count; the sort is stable, so `FirstSeen` keeps input order
pub fn sort_counts(entries: &mut [PatternCount], tie_break: TieBreak) {
    match tie_break {
        TieBreak::FirstSeen => entries.sort_by(|a, b| b.count.cmp(&a.count)),
        TieBreak::Lexicographic => entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.pattern.cmp(&b.pattern))
        }),
    }
}
