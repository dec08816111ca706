//! Dispatch of received messages to per-port handlers.
//!
//! Each listener gets a reader task that decodes datagrams and forwards the
//! contained messages into one queue. The dispatcher drains that queue on a
//! single task, so handlers run one at a time and never concurrently.
//! Messages from one port keep their arrival order; no order is defined
//! between ports.

use std::future::Future;
use std::time::Duration;

use rosc::{OscMessage, OscPacket, decoder};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::defaults;

use super::DispatchError;
use super::handler::{Disposition, Handler};
use super::listener::{Listener, ListenerRegistry};

/// How the dispatch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A handler received the exit command.
    ExitRequested {
        /// Port the command arrived on
        port: u16,
    },
    /// The shutdown future completed (e.g. Ctrl+C).
    Interrupted,
}

/// A handler registered for one listener.
struct Route {
    port: u16,
    handler: Handler,
}

/// Owns the listeners and their handlers until the dispatch loop ends.
pub struct Dispatcher {
    listeners: Vec<Listener>,
    routes: Vec<Route>,
    queue_capacity: usize,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.listeners)
            .field("queue_capacity", &self.queue_capacity)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Registers one handler per listener.
    ///
    /// `make_handler` is called once per listener, in port order, with the
    /// listener's configured port. Every message on that listener goes to
    /// the returned handler; there is no path filtering at this level.
    pub fn new<F>(registry: ListenerRegistry, mut make_handler: F) -> Self
    where
        F: FnMut(u16) -> Handler,
    {
        let listeners: Vec<Listener> = registry.into_iter().collect();
        let routes = listeners
            .iter()
            .map(|listener| Route {
                port: listener.port(),
                handler: make_handler(listener.port()),
            })
            .collect();

        Self {
            listeners,
            routes,
            queue_capacity: defaults::DISPATCH_QUEUE_CAPACITY,
        }
    }

    /// Sets the capacity of the queue between readers and handlers.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Returns the registered ports, in order.
    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.routes.iter().map(|route| route.port)
    }

    /// Runs the dispatch loop until a handler asks to exit or `shutdown`
    /// completes.
    ///
    /// No message is handled after a handler returns [`Disposition::Exit`].
    /// Reader tasks are aborted when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ListenersClosed`] if every reader stops,
    /// which also happens immediately when there are no listeners.
    pub async fn run<S>(self, shutdown: S) -> Result<Outcome, DispatchError>
    where
        S: Future<Output = ()>,
    {
        let Self {
            listeners,
            mut routes,
            queue_capacity,
        } = self;

        let (tx, rx) = mpsc::channel(queue_capacity);
        let mut readers = JoinSet::new();
        for (index, listener) in listeners.into_iter().enumerate() {
            let port = listener.port();
            readers.spawn(read_datagrams(index, port, listener.into_socket(), tx.clone()));
        }
        drop(tx);

        let mut messages = ReceiverStream::new(rx);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping...");
                    return Ok(Outcome::Interrupted);
                }

                next = messages.next() => {
                    let Some((index, message)) = next else {
                        return Err(DispatchError::ListenersClosed);
                    };
                    if let Some(port) = deliver(&mut routes[index], &message) {
                        return Ok(Outcome::ExitRequested { port });
                    }
                }
            }
        }
    }
}

/// Hands one message to its route's handler.
///
/// Returns the port if the handler asked to exit.
fn deliver(route: &mut Route, message: &OscMessage) -> Option<u16> {
    tracing::trace!(port = route.port, addr = %message.addr, "Dispatching message");

    match (route.handler)(message) {
        Disposition::Continue => None,
        Disposition::Exit => Some(route.port),
    }
}

/// Receives and decodes datagrams until the queue is closed.
async fn read_datagrams(
    index: usize,
    port: u16,
    socket: UdpSocket,
    tx: mpsc::Sender<(usize, OscMessage)>,
) {
    let mut buf = vec![0u8; defaults::MAX_DATAGRAM_SIZE];
    let mut error_streak: u32 = 0;

    loop {
        let (size, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => {
                error_streak = 0;
                received
            }
            Err(e) => {
                error_streak = error_streak.saturating_add(1);
                let delay = recv_error_backoff(error_streak);
                tracing::warn!(port, "Receive error (retrying in {}ms): {e}", delay.as_millis());
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        let packet = match decoder::decode_udp(&buf[..size]) {
            Ok((_, packet)) => packet,
            Err(e) => {
                tracing::warn!(port, "Dropping undecodable datagram from {peer}: {e}");
                continue;
            }
        };

        for message in flatten_packet(packet) {
            if tx.send((index, message)).await.is_err() {
                return;
            }
        }
    }
}

/// Delay before retrying after `streak` consecutive receive errors.
///
/// Doubles from [`defaults::RECV_ERROR_BACKOFF_INITIAL`] up to
/// [`defaults::RECV_ERROR_BACKOFF_MAX`]. A streak of zero needs no delay.
#[must_use]
pub fn recv_error_backoff(streak: u32) -> Duration {
    if streak == 0 {
        return Duration::ZERO;
    }
    let factor = 1u32.checked_shl(streak - 1).unwrap_or(u32::MAX);
    defaults::RECV_ERROR_BACKOFF_INITIAL
        .saturating_mul(factor)
        .min(defaults::RECV_ERROR_BACKOFF_MAX)
}

/// Flattens a packet into its messages, depth first.
///
/// Bundle time tags are ignored; contained messages are delivered at once.
#[must_use]
pub fn flatten_packet(packet: OscPacket) -> Vec<OscMessage> {
    let mut messages = Vec::new();
    collect_messages(packet, &mut messages);
    messages
}

fn collect_messages(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                collect_messages(inner, out);
            }
        }
    }
}
