//! Configuration layer for osclisten.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`RawArgSettings`])
//! - Config file discovery and parsing ([`RawConfigSettings`], [`Property`])
//! - The merged configuration ([`ListenConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Config File
//!
//! The first existing file of the candidate list is used (see
//! [`default_config_candidates`]); `--config` replaces the list with a single
//! path. A missing file is fatal even when ports are given on the command line.
//!
//! # Merge Rules
//!
//! - **Ports**: CLI ports are *appended* to config file ports, never replacing
//!   them. Order is preserved and duplicates are kept.
//! - **Verbosity**: OR semantics. `-v` enables both announcements; a config
//!   file value of `1` cannot be turned off from the CLI.
//! - **Greeting**: config file only.

mod cli;
pub mod defaults;
mod error;
mod file;
mod settings;


pub use cli::{Cli, Command, RawArgSettings};
pub use defaults::default_config_template;
pub use error::ConfigError;
pub use file::{
    Property, RawConfigSettings, default_config_candidates, locate_config, tokenize_line,
};
pub use settings::{ListenConfig, write_default_config};
