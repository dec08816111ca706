//! UDP listeners, one per configured port.

use std::io;
use std::net::{IpAddr, SocketAddr};

use tokio::net::UdpSocket;

use super::ListenError;

/// A bound UDP socket and the port it was configured for.
#[derive(Debug)]
pub struct Listener {
    port: u16,
    socket: UdpSocket,
}

impl Listener {
    /// Binds a UDP socket on `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`ListenError::Bind`] if the socket cannot be bound.
    pub async fn bind(host: IpAddr, port: u16) -> Result<Self, ListenError> {
        let socket = UdpSocket::bind(SocketAddr::new(host, port))
            .await
            .map_err(|source| ListenError::Bind { port, source })?;

        Ok(Self { port, socket })
    }

    /// Returns the configured port number.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the address the socket is actually bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS cannot report the address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub(crate) fn into_socket(self) -> UdpSocket {
        self.socket
    }
}

/// All listeners opened for a run, in configured port order.
///
/// Populated once by [`ListenerRegistry::bind`] and then handed to the
/// dispatcher by value.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    /// Opens one listener per port, strictly in order.
    ///
    /// Stops at the first failure; listeners already opened are closed when
    /// the partial registry is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ListenError::Bind`] for the first port that cannot be bound.
    pub async fn bind(host: IpAddr, ports: &[u16]) -> Result<Self, ListenError> {
        let mut listeners = Vec::with_capacity(ports.len());

        for &port in ports {
            let listener = Listener::bind(host, port).await?;
            match listener.local_addr() {
                Ok(addr) => tracing::info!("Listening for OSC on {addr}"),
                Err(_) => tracing::info!("Listening for OSC on port {port}"),
            }
            listeners.push(listener);
        }

        Ok(Self { listeners })
    }

    /// Returns the configured ports, in order.
    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.listeners.iter().map(Listener::port)
    }

    /// Returns the listeners, in order.
    #[must_use]
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// Returns the number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listener is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl IntoIterator for ListenerRegistry {
    type Item = Listener;
    type IntoIter = std::vec::IntoIter<Listener>;

    fn into_iter(self) -> Self::IntoIter {
        self.listeners.into_iter()
    }
}
