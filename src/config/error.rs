//! Error types for configuration loading and merging.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is fatal: the process reports it and exits before any
/// listener is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the candidate configuration files exist.
    #[error("No configuration file found (searched: {})", display_paths(searched))]
    NotFound {
        /// Candidate paths that were checked, in order
        searched: Vec<PathBuf>,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A recognized property was given without a value.
    #[error("{}:{line}: missing value for '{key}'", path.display())]
    MissingValue {
        /// Path to the config file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// The property key
        key: &'static str,
    },

    /// A numeric property was given a value that is not an integer.
    #[error("{}:{line}: invalid integer '{value}' for '{key}'", path.display())]
    InvalidNumber {
        /// Path to the config file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// The property key
        key: &'static str,
        /// The offending token
        value: String,
    },

    /// A listen port outside `1..=65535`.
    #[error("{}:{line}: invalid port '{value}': expected 1-65535", path.display())]
    InvalidPort {
        /// Path to the config file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// The offending token
        value: String,
    },

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Neither the config file nor the command line named a port.
    #[error("No listen ports configured. Use --listen or set osclisten.listen_port in config file")]
    NoListenPorts,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
