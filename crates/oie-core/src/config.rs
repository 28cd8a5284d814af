//! OIE Configuration Management
//!
//! Handles configuration from environment variables, config files,
//! and command-line arguments. Every engine call receives its settings
//! explicitly; nothing here is process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Simplifier settings
    pub simplify: SimplifyConfig,

    /// Compressor settings
    pub compress: CompressConfig,

    /// Result table ordering
    pub table: TableConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Simplifier
        if let Ok(mode) = std::env::var("OIE_SIMPLIFY_MODE") {
            self.simplify.mode = mode.parse()?;
        }
        if let Ok(brace) = std::env::var("OIE_BRACE_ROLES") {
            self.simplify.brace_roles = brace.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OIE_BRACE_ROLES".to_string(),
                value: brace,
            })?;
        }

        // Compressor
        if let Ok(strategy) = std::env::var("OIE_COMPRESSION") {
            self.compress.strategy = strategy.parse()?;
        }
        if let Ok(top_n) = std::env::var("OIE_TOP_N") {
            let parsed = top_n.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OIE_TOP_N".to_string(),
                value: top_n,
            })?;
            self.compress.top_n = Some(parsed);
        }

        // Table
        if let Ok(tie_break) = std::env::var("OIE_TIE_BREAK") {
            self.table.tie_break = tie_break.parse()?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }
}

/// How aggressively atoms are generalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimplifyMode {
    /// Concept-like atoms collapse to `*/T`
    #[default]
    Strict,
    /// Concept-like atoms keep their subtype marker, `*/Ts`
    Loose,
}

impl std::str::FromStr for SimplifyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "loose" => Ok(Self::Loose),
            _ => Err(ConfigError::InvalidValue {
                key: "OIE_SIMPLIFY_MODE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SimplifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Loose => write!(f, "loose"),
        }
    }
}

/// Simplifier configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Strict or loose generalization of concept-like atoms
    pub mode: SimplifyMode,

    /// Render predicate/builder role sets as sorted `{..}` groups
    pub brace_roles: bool,
}

impl SimplifyConfig {
    pub fn strict() -> Self {
        Self {
            mode: SimplifyMode::Strict,
            brace_roles: false,
        }
    }

    pub fn loose() -> Self {
        Self {
            mode: SimplifyMode::Loose,
            brace_roles: false,
        }
    }

    pub fn with_brace_roles(mut self, brace_roles: bool) -> Self {
        self.brace_roles = brace_roles;
        self
    }
}

/// Pair-merging policy of the compressor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionStrategy {
    /// Single pass, first compatible partner wins, input order matters
    Greedy,
    /// Merge under a canonical order until no pair is compatible
    #[default]
    Fixpoint,
}

impl std::str::FromStr for CompressionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "fixpoint" => Ok(Self::Fixpoint),
            _ => Err(ConfigError::InvalidValue {
                key: "OIE_COMPRESSION".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CompressionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::Fixpoint => write!(f, "fixpoint"),
        }
    }
}

/// Number of simplified patterns handed to the compressor by default
pub const DEFAULT_TOP_N: usize = 50;

/// Compressor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// Merge policy
    pub strategy: CompressionStrategy,

    /// Only the `top_n` most frequent simplified patterns are compressed;
    /// `0` or `None` compresses all of them
    pub top_n: Option<usize>,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            strategy: CompressionStrategy::default(),
            top_n: Some(DEFAULT_TOP_N),
        }
    }
}

impl CompressConfig {
    /// Effective cap on the compressor's input
    pub fn limit(&self) -> Option<usize> {
        self.top_n.filter(|&n| n > 0)
    }
}

/// Ordering among patterns with equal counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order in which patterns were first recorded
    #[default]
    FirstSeen,
    /// Order by pattern string
    Lexicographic,
}

impl std::str::FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_seen" => Ok(Self::FirstSeen),
            "lexicographic" => Ok(Self::Lexicographic),
            _ => Err(ConfigError::InvalidValue {
                key: "OIE_TIE_BREAK".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Result table configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub tie_break: TieBreak,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
