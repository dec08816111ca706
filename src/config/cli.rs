//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// OSC Listen: display incoming Open Sound Control messages
///
/// Listens on every port named in the config file plus any given with
/// --listen, and prints each received message as `<port>: <path> <args>`.
#[derive(Debug, Parser)]
#[command(name = "osclisten")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Additional ports to listen for OSC messages on
    ///
    /// Takes every value up to the next flag, so put `init` before it.
    #[arg(
        short = 'l',
        long = "listen",
        value_name = "PORT",
        num_args = 1..,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub listen: Vec<u16>,

    /// Verbosely display listen ports and MOTD on startup
    #[arg(long, short)]
    pub verbose: bool,

    /// Path to configuration file (replaces the default search list)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// Subcommands for osclisten
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::INIT_OUTPUT)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}

/// Settings contributed by the command line.
///
/// Same shape as [`RawConfigSettings`](super::RawConfigSettings) minus the
/// greeting, which has no CLI override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArgSettings {
    /// Ports appended after the config file's ports
    pub listen_ports: Vec<u16>,
    /// Print the port list at startup
    pub verbose_listen_ports: bool,
    /// Print the greeting at startup
    pub verbose_motd: bool,
}

impl From<&Cli> for RawArgSettings {
    fn from(cli: &Cli) -> Self {
        // -v turns on both announcements
        Self {
            listen_ports: cli.listen.clone(),
            verbose_listen_ports: cli.verbose,
            verbose_motd: cli.verbose,
        }
    }
}
