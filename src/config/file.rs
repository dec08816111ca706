//! Configuration file discovery and parsing.
//!
//! The file is line oriented: `<key> <value...> [# comment]`. Each line is
//! split into a key and its value tokens, and the key is looked up in
//! [`Property::ALL`]. Unrecognized keys are skipped.

use std::path::{Path, PathBuf};

use super::ConfigError;
use super::defaults;

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfigSettings {
    /// Ports from `osclisten.listen_port` lines, in file order
    pub listen_ports: Vec<u16>,
    /// Value of `osclisten.verbose_listen_ports`
    pub verbose_listen_ports: bool,
    /// Value of `osclisten.verbose_motd`
    pub verbose_motd: bool,
    /// Greeting from `osclisten.motd` lines
    pub motd: String,
}

/// A property recognized in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// `osclisten.verbose_listen_ports <0|1>`
    VerboseListenPorts,
    /// `osclisten.verbose_motd <0|1>`
    VerboseMotd,
    /// `osclisten.motd <text...>`
    Motd,
    /// `osclisten.listen_port <port>`, repeatable
    ListenPort,
}

impl Property {
    /// Every recognized property, with its key.
    pub const ALL: [(&'static str, Self); 4] = [
        ("osclisten.verbose_listen_ports", Self::VerboseListenPorts),
        ("osclisten.verbose_motd", Self::VerboseMotd),
        ("osclisten.motd", Self::Motd),
        ("osclisten.listen_port", Self::ListenPort),
    ];

    /// Looks up a property by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, property)| property)
    }

    /// Returns the key this property is written as.
    #[must_use]
    pub fn key(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, property)| *property == self)
            .map_or("", |&(name, _)| name)
    }
}

/// Splits a line into its key and value tokens.
///
/// Everything after the first comment marker is dropped and the rest is
/// split on whitespace. Returns `None` for blank or comment-only lines.
#[must_use]
pub fn tokenize_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let content = line
        .split_once(defaults::COMMENT_MARKER)
        .map_or(line, |(before, _)| before);

    let mut tokens = content.split_whitespace();
    let key = tokens.next()?;
    Some((key, tokens.collect()))
}

/// Returns the default configuration file search list, in priority order.
#[must_use]
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(defaults::CONFIG_FILE_NAME)];

    if let Some(dir) = dirs::config_dir() {
        candidates.push(
            dir.join(defaults::CONFIG_DIR_NAME)
                .join(defaults::CONFIG_FILE_NAME),
        );
    }

    #[cfg(unix)]
    candidates.push(
        Path::new(defaults::SYSTEM_CONFIG_DIR)
            .join(defaults::CONFIG_DIR_NAME)
            .join(defaults::CONFIG_FILE_NAME),
    );

    candidates
}

/// Returns the first candidate path that exists.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if none of the candidates exist.
pub fn locate_config(candidates: &[PathBuf]) -> Result<&Path, ConfigError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .map(PathBuf::as_path)
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates.to_vec(),
        })
}

impl RawConfigSettings {
    /// Loads settings from the first existing candidate file.
    ///
    /// Returns the chosen path alongside the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate exists, the file cannot be read,
    /// or a recognized line has a missing or malformed value.
    pub fn locate_and_load(candidates: &[PathBuf]) -> Result<(PathBuf, Self), ConfigError> {
        let path = locate_config(candidates)?;
        let settings = Self::load(path)?;
        Ok((path.to_path_buf(), settings))
    }

    /// Loads settings from a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains a malformed line.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses settings from configuration text.
    ///
    /// `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error for a recognized key whose value is missing or malformed.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        for (index, line) in content.lines().enumerate() {
            let Some((key, values)) = tokenize_line(line) else {
                continue;
            };

            let Some(property) = Property::from_key(key) else {
                tracing::debug!("{}:{}: ignoring unknown key '{key}'", origin.display(), index + 1);
                continue;
            };

            let location = Location {
                path: origin,
                line: index + 1,
            };
            settings.apply(property, &values, &location)?;
        }

        Ok(settings)
    }

    fn apply(
        &mut self,
        property: Property,
        values: &[&str],
        location: &Location<'_>,
    ) -> Result<(), ConfigError> {
        match property {
            Property::VerboseListenPorts => {
                self.verbose_listen_ports = parse_flag(property, values, location)?;
            }
            Property::VerboseMotd => {
                self.verbose_motd = parse_flag(property, values, location)?;
            }
            Property::Motd => {
                if !self.motd.is_empty() && !values.is_empty() {
                    self.motd.push(' ');
                }
                self.motd.push_str(&values.join(" "));
            }
            Property::ListenPort => {
                self.listen_ports.push(parse_port(values, location)?);
            }
        }
        Ok(())
    }
}

/// Where a config line came from, for error reporting.
struct Location<'a> {
    path: &'a Path,
    line: usize,
}

fn first_value<'v>(
    property: Property,
    values: &[&'v str],
    location: &Location<'_>,
) -> Result<&'v str, ConfigError> {
    values.first().copied().ok_or_else(|| ConfigError::MissingValue {
        path: location.path.to_path_buf(),
        line: location.line,
        key: property.key(),
    })
}

fn parse_integer(
    property: Property,
    values: &[&str],
    location: &Location<'_>,
) -> Result<i64, ConfigError> {
    let value = first_value(property, values, location)?;
    value.parse::<i64>().map_err(|_| ConfigError::InvalidNumber {
        path: location.path.to_path_buf(),
        line: location.line,
        key: property.key(),
        value: value.to_string(),
    })
}

fn parse_flag(
    property: Property,
    values: &[&str],
    location: &Location<'_>,
) -> Result<bool, ConfigError> {
    parse_integer(property, values, location).map(|n| n != 0)
}

fn parse_port(values: &[&str], location: &Location<'_>) -> Result<u16, ConfigError> {
    let number = parse_integer(Property::ListenPort, values, location)?;

    u16::try_from(number)
        .ok()
        .filter(|&port| port != 0)
        .ok_or_else(|| ConfigError::InvalidPort {
            path: location.path.to_path_buf(),
            line: location.line,
            value: number.to_string(),
        })
}
