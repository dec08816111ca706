//! Default values for configuration options.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// File name of the shared toolkit configuration file.
pub const CONFIG_FILE_NAME: &str = "osctoolkit.conf";

/// Directory (under the user or system config dir) holding the config file.
pub const CONFIG_DIR_NAME: &str = "osctoolkit";

/// System-wide configuration directory on unix.
#[cfg(unix)]
pub const SYSTEM_CONFIG_DIR: &str = "/etc";

/// Default output path for `osclisten init`.
pub const INIT_OUTPUT: &str = CONFIG_FILE_NAME;

/// Comment marker for config file lines.
pub const COMMENT_MARKER: char = '#';

/// Address every listener binds to.
pub const BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Capacity of the queue between listener reader tasks and the dispatcher.
pub const DISPATCH_QUEUE_CAPACITY: usize = 1024;

/// Largest UDP datagram a listener accepts.
pub const MAX_DATAGRAM_SIZE: usize = 65_536;

/// First delay after a failed receive on a listener.
pub const RECV_ERROR_BACKOFF_INITIAL: Duration = Duration::from_millis(10);

/// Upper bound for the delay between repeated receive failures.
pub const RECV_ERROR_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r"# OSC Toolkit Configuration File
#
# Format: <key> <value...>   (anything after '#' is ignored)

# Print each listen port at startup (0 = off, 1 = on; -v forces on)
osclisten.verbose_listen_ports 1

# Print the greeting below at startup (0 = off, 1 = on; -v forces on)
osclisten.verbose_motd 1

# Greeting printed at startup. Repeated lines are appended.
osclisten.motd Listening for Open Sound Control messages.

# Ports to listen on, one per line. Ports passed with --listen are added to these.
osclisten.listen_port 9000
# osclisten.listen_port 9001
"
    .to_string()
}
