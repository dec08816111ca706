//! Effective configuration after merging the config file and CLI sources.
//!
//! The merge itself ([`ListenConfig::merge`]) is pure; [`ListenConfig::load`]
//! wires it to config file discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use super::cli::{Cli, RawArgSettings};
use super::error::ConfigError;
use super::file::{RawConfigSettings, default_config_candidates};

/// Effective settings for a run of the listener.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenConfig {
    /// Ports to listen on, config file ports first. Duplicates are kept.
    pub listen_ports: Vec<u16>,

    /// Print each port at startup
    pub verbose_listen_ports: bool,

    /// Print the greeting at startup
    pub verbose_motd: bool,

    /// Greeting text
    pub motd: String,
}

impl fmt::Display for ListenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ports = self
            .listen_ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "Config {{ listen_ports: [{ports}], verbose_listen_ports: {}, verbose_motd: {}, motd: {:?} }}",
            self.verbose_listen_ports, self.verbose_motd, self.motd,
        )
    }
}

impl ListenConfig {
    /// Combines config file settings with CLI settings.
    ///
    /// - Ports: config file ports followed by CLI ports, no deduplication.
    /// - Verbosity flags: OR of both sources (CLI can only enable).
    /// - Greeting: config file only.
    #[must_use]
    pub fn merge(config: RawConfigSettings, args: RawArgSettings) -> Self {
        let mut listen_ports = config.listen_ports;
        listen_ports.extend(args.listen_ports);

        Self {
            listen_ports,
            verbose_listen_ports: args.verbose_listen_ports || config.verbose_listen_ports,
            verbose_motd: args.verbose_motd || config.verbose_motd,
            motd: config.motd,
        }
    }

    /// Loads the config file, merges it with the CLI and validates the result.
    ///
    /// If `cli.config` is set, it is the only candidate path; otherwise the
    /// default search list is used. Returns the chosen file path alongside
    /// the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No candidate config file exists, or it cannot be read
    /// - A recognized config line has a missing or malformed value
    /// - The merged port list is empty
    pub fn load(cli: &Cli) -> Result<(PathBuf, Self), ConfigError> {
        let candidates = cli
            .config
            .as_ref()
            .map_or_else(default_config_candidates, |path| vec![path.clone()]);

        Self::load_from(cli, &candidates)
    }

    /// Like [`ListenConfig::load`], with an explicit candidate list.
    ///
    /// # Errors
    ///
    /// See [`ListenConfig::load`].
    pub fn load_from(cli: &Cli, candidates: &[PathBuf]) -> Result<(PathBuf, Self), ConfigError> {
        let (path, file_settings) = RawConfigSettings::locate_and_load(candidates)?;
        let config = Self::merge(file_settings, RawArgSettings::from(cli)).validate()?;
        Ok((path, config))
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.listen_ports.is_empty() {
            return Err(ConfigError::NoListenPorts);
        }
        Ok(self)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::defaults::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
