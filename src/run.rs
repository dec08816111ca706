//! Application execution logic.
//!
//! Opens the listeners, registers a handler per port, prints the startup
//! announcements and runs the dispatch loop until the exit command or a
//! shutdown signal.

use std::io;

use thiserror::Error;
use tokio::signal;

use osclisten::announce::announce;
use osclisten::config::{ListenConfig, defaults};
use osclisten::osc::{DispatchError, Dispatcher, ListenError, ListenerRegistry, Outcome, make_handler};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A listener could not be opened.
    #[error(transparent)]
    Listen(#[from] ListenError),

    /// The dispatch loop stopped on its own.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Executes the listener.
///
/// This function:
/// 1. Binds one UDP listener per configured port, in order
/// 2. Registers an echo handler per port
/// 3. Prints the port list and greeting (if enabled)
/// 4. Dispatches messages until the exit command or Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Any port cannot be bound (nothing is dispatched in that case)
/// - Every listener stops before the exit command
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires
/// real async runtime with signal handling.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ListenConfig) -> Result<(), RunError> {
    let dispatcher = provision(config).await?;

    if let Err(e) = announce(config, &mut io::stdout().lock()) {
        tracing::warn!("Failed to print startup announcement: {e}");
    }

    match dispatcher.run(shutdown_signal()).await? {
        Outcome::ExitRequested { port } => {
            tracing::info!("Exit command received on port {port}, stopping...");
        }
        Outcome::Interrupted => {}
    }

    Ok(())
}

/// Binds the configured ports and registers a stdout echo handler for each.
async fn provision(config: &ListenConfig) -> Result<Dispatcher, RunError> {
    let registry = ListenerRegistry::bind(defaults::BIND_HOST, &config.listen_ports).await?;
    Ok(Dispatcher::new(registry, |port| make_handler(port, io::stdout())))
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a handler cannot be installed, that signal is logged and ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
