//! Error types for listener setup and dispatch.

use thiserror::Error;

/// Error type for opening listeners.
#[derive(Debug, Error)]
pub enum ListenError {
    /// A UDP socket could not be bound to the requested port.
    ///
    /// Typically the port is already in use or requires privileges.
    #[error("Failed to listen on port {port}: {source}")]
    Bind {
        /// The configured port
        port: u16,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Error type for the dispatch loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every listener stopped before an exit request or shutdown signal.
    #[error("All listeners closed unexpectedly")]
    ListenersClosed,
}
