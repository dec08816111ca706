//! OSC layer: listeners, per-port handlers and the dispatch loop.
//!
//! This module provides:
//! - UDP listeners, one per configured port ([`Listener`], [`ListenerRegistry`])
//! - Per-port handlers that echo messages ([`Handler`], [`make_handler`])
//! - The reserved exit command ([`EXIT_PATH`], [`is_exit_request`])
//! - Argument rendering ([`render_args`], [`render_line`])
//! - The blocking dispatch loop ([`Dispatcher`], [`Outcome`])
//! - Error handling ([`ListenError`], [`DispatchError`])

mod control;
mod dispatch;
mod error;
mod handler;
mod listener;
mod render;

#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod test_fixtures;

pub use control::{EXIT_PATH, EXIT_VALUE, arg_as_int, is_exit_request};
pub use dispatch::{Dispatcher, Outcome, flatten_packet, recv_error_backoff};
pub use error::{DispatchError, ListenError};
pub use handler::{Disposition, Handler, make_handler};
pub use listener::{Listener, ListenerRegistry};
pub use render::{render_args, render_line};

/// Re-exported message type handled by [`Handler`]s.
pub use rosc::OscMessage;
