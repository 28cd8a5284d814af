//! OIE Core - Shared types, errors, and configuration
//!
//! This crate defines the abstractions shared by the pattern engine and its
//! front ends:
//! - Common error types
//! - Boundary data shapes (raw observations, generalized pattern counts)
//! - Configuration management

pub mod config;
pub mod observation;

pub use config::{
    AppConfig, CompressConfig, CompressionStrategy, ConfigError, LoggingConfig, SimplifyConfig,
    SimplifyMode, TableConfig, TieBreak, DEFAULT_TOP_N,
};
pub use observation::{parse_observations, render_table, Observation, PatternCount};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for pattern operations
///
/// Incompatible pattern pairs are not errors; the comparator reports them
/// as a regular outcome. These variants cover contract violations only.
#[derive(Error, Debug)]
pub enum OieError {
    #[error("Malformed pattern `{pattern}`: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("Malformed atom `{atom}`: {reason}")]
    MalformedAtom { atom: String, reason: String },

    #[error("Atom `{atom}` is shorter than the {min}-character header")]
    AtomTooShort { atom: String, min: usize },

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OieError {
    pub fn malformed_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_atom(atom: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAtom {
            atom: atom.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for OieError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OieError::malformed_pattern("(a b", "unclosed `(`");
        assert_eq!(err.to_string(), "Malformed pattern `(a b`: unclosed `(`");

        let err = OieError::AtomTooShort {
            atom: "*".to_string(),
            min: 3,
        };
        assert!(err.to_string().contains("3-character header"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: OieError = ConfigError::InvalidValue {
            key: "OIE_SIMPLIFY_MODE".to_string(),
            value: "medium".to_string(),
        }
        .into();
        assert!(matches!(err, OieError::ConfigError(_)));
        assert!(err.to_string().contains("medium"));
    }
}
