//! Pattern compression
//!
//! Reduces a frequency-sorted pattern list by merging compatible pairs with
//! [`compare`]. Counts of merged patterns are summed, so the total count is
//! conserved.

use tracing::{debug, info};

use oie_core::{CompressionStrategy, PatternCount, Result};

use crate::compare::{compare, MergeOutcome};
use crate::node::PatternNode;
use crate::table::PatternTable;
use crate::PatternCompressor;

/// A parsed pattern with its count
#[derive(Debug, Clone)]
struct Entry {
    key: String,
    node: PatternNode,
    count: u64,
}

/// Parse patterns once, summing duplicate keys
fn parse_entries(patterns: &[PatternCount]) -> Result<Vec<Entry>> {
    let table: PatternTable = patterns.iter().collect();
    table
        .iter()
        .map(|(key, count)| -> Result<Entry> {
            Ok(Entry {
                key: key.to_string(),
                node: PatternNode::parse(key)?,
                count,
            })
        })
        .collect()
}

/// Build the compressor for a configured strategy
pub fn compressor_for(strategy: CompressionStrategy) -> Box<dyn PatternCompressor> {
    match strategy {
        CompressionStrategy::Greedy => Box::new(GreedyCompressor),
        CompressionStrategy::Fixpoint => Box::new(FixpointCompressor),
    }
}

// ============================================================================
// Greedy
// ============================================================================

/// Single greedy pass in input order
///
/// Each unused pattern merges with the first later unused pattern it is
/// compatible with, and at most once. The outcome depends on input order
/// and mergeable patterns may remain.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyCompressor;

impl PatternCompressor for GreedyCompressor {
    fn compress(&self, patterns: &[PatternCount]) -> Result<PatternTable> {
        let entries = parse_entries(patterns)?;
        let mut used = vec![false; entries.len()];
        let mut compressed = PatternTable::new();

        for (i, entry) in entries.iter().enumerate() {
            if used[i] {
                continue;
            }

            let mut partner = None;
            for (j, other) in entries.iter().enumerate().skip(i + 1) {
                if used[j] {
                    continue;
                }
                debug!("compare {} against {}", entry.key, other.key);
                match compare(&entry.node, &other.node)? {
                    MergeOutcome::Merged(node) => {
                        partner = Some((j, node));
                        break;
                    }
                    MergeOutcome::NoMerge(reason) => {
                        debug!("patterns cannot be compressed: {}", reason)
                    }
                }
            }

            match partner {
                Some((j, node)) => {
                    used[i] = true;
                    used[j] = true;
                    let merged = node.to_string();
                    debug!("compression found: {}", merged);
                    compressed.add(merged, entry.count + entries[j].count);
                }
                None => compressed.add(entry.key.clone(), entry.count),
            }
        }

        info!(
            input = entries.len(),
            output = compressed.len(),
            "greedy compression finished"
        );
        Ok(compressed)
    }
}

// ============================================================================
// Fixpoint
// ============================================================================

/// Repeated merging under a canonical order
///
/// Patterns are ordered by descending count, then by pattern string, and the
/// first compatible pair in that order is merged. This repeats until no pair
/// merges, so the result does not depend on input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixpointCompressor;

impl FixpointCompressor {
    fn first_mergeable_pair(entries: &[Entry]) -> Result<Option<(usize, usize, PatternNode)>> {
        for (i, left) in entries.iter().enumerate() {
            for (j, right) in entries.iter().enumerate().skip(i + 1) {
                if let MergeOutcome::Merged(node) = compare(&left.node, &right.node)? {
                    return Ok(Some((i, j, node)));
                }
            }
        }
        Ok(None)
    }
}

impl PatternCompressor for FixpointCompressor {
    fn compress(&self, patterns: &[PatternCount]) -> Result<PatternTable> {
        let mut entries = parse_entries(patterns)?;
        let input = entries.len();
        let mut merges = 0usize;

        loop {
            entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
            let Some((i, j, node)) = Self::first_mergeable_pair(&entries)? else {
                break;
            };

            // j > i, so removing j first keeps i valid
            let right = entries.remove(j);
            let left = entries.remove(i);
            let key = node.to_string();
            let count = left.count + right.count;
            debug!("compression found: {} + {} -> {}", left.key, right.key, key);

            match entries.iter_mut().find(|e| e.key == key) {
                Some(existing) => existing.count += count,
                None => entries.push(Entry { key, node, count }),
            }
            merges += 1;
        }

        info!(
            input,
            output = entries.len(),
            merges,
            "fixpoint compression finished"
        );
        Ok(entries
            .into_iter()
            .map(|e| PatternCount::new(e.key, e.count))
            .collect())
    }
}
