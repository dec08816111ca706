//! Startup announcements.

use std::io::{self, Write};

use crate::config::ListenConfig;

/// Prints the port list and greeting, each only if enabled.
///
/// Each section is followed by a blank line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn announce<W: Write>(config: &ListenConfig, out: &mut W) -> io::Result<()> {
    if config.verbose_listen_ports {
        for port in &config.listen_ports {
            writeln!(out, "Listening for OSC on port number: {port}")?;
        }
        writeln!(out)?;
    }

    if config.verbose_motd {
        writeln!(out, "{}", config.motd)?;
        writeln!(out)?;
    }

    out.flush()
}
