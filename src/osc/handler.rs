//! Per-port message handlers.
//!
//! [`make_handler`] builds one handler per listen port. Each handler owns
//! its port number and output sink, so two ports never share a handler.

use std::io::Write;

use rosc::OscMessage;

use super::control::is_exit_request;
use super::render::render_line;

/// What the dispatcher should do after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Disposition {
    /// Keep dispatching.
    Continue,
    /// Stop dispatching and exit normally.
    Exit,
}

/// A message handler bound to one listen port.
pub type Handler = Box<dyn FnMut(&OscMessage) -> Disposition + Send>;

/// Builds the handler for `port`.
///
/// The handler returns [`Disposition::Exit`] for the control command and
/// otherwise writes `<port>: <path> <args>` as one line to `out`. A failed
/// write is logged and does not stop dispatch.
pub fn make_handler<W>(port: u16, mut out: W) -> Handler
where
    W: Write + Send + 'static,
{
    Box::new(move |message: &OscMessage| {
        if is_exit_request(message) {
            tracing::info!(port, "Exit requested via {}", message.addr);
            return Disposition::Exit;
        }

        let line = render_line(port, message);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(port, "Failed to write message: {e}");
        }
        Disposition::Continue
    })
}
