//! End-to-end generalization
//!
//! Observations are simplified, ranked, optionally cut to the most frequent
//! patterns, and then compressed. Every run rebuilds its tables from the
//! full observation set.

use tracing::info;

use oie_core::{AppConfig, Observation, PatternCount, Result, TieBreak};

use crate::compress::compressor_for;
use crate::simplify::Simplifier;
use crate::table::PatternTable;
use crate::PatternCompressor;

/// Simplifier and compressor configured from an [`AppConfig`]
pub struct PatternPipeline {
    simplifier: Simplifier,
    compressor: Box<dyn PatternCompressor>,
    top_n: Option<usize>,
    tie_break: TieBreak,
}

impl PatternPipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            simplifier: Simplifier::new(config.simplify.clone()),
            compressor: compressor_for(config.compress.strategy),
            top_n: config.compress.limit(),
            tie_break: config.table.tie_break,
        }
    }

    /// Canonical patterns sorted by count, with the total observation count
    pub fn simplify(&self, observations: &[Observation]) -> Result<(Vec<PatternCount>, u64)> {
        let simplified = self.simplifier.simplify_observations(observations)?;
        Ok((simplified.table.sorted(self.tie_break), simplified.total))
    }

    /// Compress an already ranked pattern list
    pub fn compress(&self, patterns: &[PatternCount]) -> Result<Vec<PatternCount>> {
        Ok(self.compressor.compress(patterns)?.sorted(self.tie_break))
    }

    /// Simplify, rank, keep the top `n` if configured, and compress
    ///
    /// Fixpoint compression is cubic in the number of patterns it receives,
    /// so the default keeps the 50 most frequent.
    pub fn generalise(&self, observations: &[Observation]) -> Result<Vec<PatternCount>> {
        let simplified = self.simplifier.simplify_observations(observations)?;
        let ranked = match self.top_n {
            Some(n) => simplified.table.top(n, self.tie_break),
            None => simplified.table.sorted(self.tie_break),
        };

        let generalised = self.compress(&ranked)?;
        info!(
            observations = observations.len(),
            total = simplified.total,
            compressed_from = ranked.len(),
            patterns = generalised.len(),
            "generalised patterns"
        );
        Ok(generalised)
    }
}

/// Run [`PatternPipeline::generalise`] with `config`
pub fn generalise(observations: &[Observation], config: &AppConfig) -> Result<Vec<PatternCount>> {
    PatternPipeline::new(config).generalise(observations)
}

/// Sum of counts in a table, used to check conservation
pub fn total_count(patterns: &[PatternCount]) -> u64 {
    patterns.iter().collect::<PatternTable>().total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use oie_core::{CompressionStrategy, SimplifyMode};

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new("(is/Pd.so mary/Cp.s park/Cc.s)", 4),
            Observation::new("(is/Pd.sr john/Cp.s happy/Ma)", 1),
            Observation::new("(is/Pd.so john/Cp.s lake/Cc.s)", 2),
            Observation::new("(likes/Pd.sr mary/Cp.s happy/Ma)", 1),
            Observation::new("(gave/Pd.sox (the/Md man/Cc.s) */Cc.s */Cc.s)", 3),
            Observation::new("(is/Pd.sr mary/Cp.s happy/Mb)", 2),
        ]
    }

    #[test]
    fn test_generalise_default() {
        let result = generalise(&observations(), &AppConfig::default()).unwrap();
        assert_eq!(
            result,
            vec![
                PatternCount::new("(is/Pd.so */C */C)", 6),
                PatternCount::new("(gave/Pd.sox (the/Md */C) */C */C)", 3),
                PatternCount::new("(is/Pd.sr */C happy/M[ab])", 3),
                PatternCount::new("(likes/Pd.sr */C happy/Ma)", 1),
            ]
        );
        assert_eq!(total_count(&result), 13);
    }

    #[test]
    fn test_generalise_top_n() {
        let mut config = AppConfig::default();
        config.compress.top_n = Some(2);
        let result = generalise(&observations(), &config).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(total_count(&result), 9);
    }

    #[test]
    fn test_simplify_reports_total() {
        let mut config = AppConfig::default();
        config.simplify.mode = SimplifyMode::Loose;
        let pipeline = PatternPipeline::new(&config);
        let (ranked, total) = pipeline.simplify(&observations()).unwrap();
        assert_eq!(total, 13);
        assert_eq!(ranked[0], PatternCount::new("(is/Pd.so */Cp */Cc)", 6));
    }

    #[test]
    fn test_compress_with_greedy_strategy() {
        let mut config = AppConfig::default();
        config.compress.strategy = CompressionStrategy::Greedy;
        let pipeline = PatternPipeline::new(&config);
        let compressed = pipeline
            .compress(&[
                PatternCount::new("(P1/Cx A/Cx)", 3),
                PatternCount::new("(P1/Cy A/Cx)", 2),
                PatternCount::new("(Q1/Dx A/Cx)", 1),
            ])
            .unwrap();
        assert_eq!(
            compressed,
            vec![
                PatternCount::new("(P1/C[xy] A/Cx)", 5),
                PatternCount::new("(Q1/Dx A/Cx)", 1),
            ]
        );
    }

    #[test]
    fn test_default_caps_compressor_input() {
        let observations: Vec<Observation> = (0..60)
            .map(|i| Observation::new(format!("(p{i:02}/Pd.so ARG0)"), 60 - i))
            .collect();
        let result = generalise(&observations, &AppConfig::default()).unwrap();
        assert_eq!(result.len(), 50);
        assert_eq!(result[49], PatternCount::new("(p49/Pd.so ARG0)", 11));

        let mut config = AppConfig::default();
        config.compress.top_n = Some(0);
        assert_eq!(generalise(&observations, &config).unwrap().len(), 60);
    }

    #[test]
    fn test_empty_observations() {
        assert!(generalise(&[], &AppConfig::default()).unwrap().is_empty());
    }
}
