//! Tokio-based receiver turning a UDP datagram stream into frames.
//!
//! [`FrameReceiver`] owns the socket and a [`ReceiveDriver`]. Its run loop
//! waits on the socket, the in-flight frame's staleness deadline and a
//! shutdown signal, and hands every reconstructed frame to a bounded channel
//! as an owned buffer.

use std::{io, net::SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::config::ReceiverConfig;

pub mod driver;
pub mod error;
pub mod runtime;

pub use driver::{Disposition, ReceiveDriver};
pub use error::ReceiverError;
pub use runtime::{BackoffConfig, DatagramSource, ReceiveStats};


/// Frame receiver bound to a datagram source.
///
/// # Examples
///
/// ```no_run
/// use depthframe::{config::ReceiverConfig, receiver::FrameReceiver};
/// use tokio::sync::mpsc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), depthframe::receiver::ReceiverError> {
/// let receiver = FrameReceiver::bind(ReceiverConfig::default())?;
/// let (tx, mut rx) = mpsc::channel::<depthframe::ReassembledFrame>(4);
/// tokio::spawn(async move {
///     while let Some(frame) = rx.recv().await {
///         println!("frame of {} bytes", frame.payload().len());
///     }
/// });
/// receiver.run(tx).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FrameReceiver<S = UdpSocket> {
    source: S,
    config: ReceiverConfig,
}

impl FrameReceiver<UdpSocket> {
    /// Bind a UDP socket as described by `config`.
    ///
    /// The socket's receive buffer is enlarged to `config.recv_buffer_size`
    /// before binding. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Config`] for an invalid configuration,
    /// [`ReceiverError::Bind`] if the address cannot be bound and
    /// [`ReceiverError::Socket`] if a socket option cannot be applied.
    pub fn bind(config: ReceiverConfig) -> Result<Self, ReceiverError> {
        config.validate()?;
        let socket = bind_udp(&config)?;
        let source = UdpSocket::from_std(socket.into())?;
        Ok(Self { source, config })
    }
}

impl<S: DatagramSource> FrameReceiver<S> {
    /// Wrap an existing datagram source.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Config`] for an invalid configuration.
    pub fn with_source(source: S, config: ReceiverConfig) -> Result<Self, ReceiverError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Address the underlying source is bound to.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the source.
    pub fn local_addr(&self) -> io::Result<SocketAddr> { self.source.local_addr() }

    /// Configuration the receiver runs with.
    #[must_use]
    pub const fn config(&self) -> &ReceiverConfig { &self.config }
}

fn bind_udp(config: &ReceiverConfig) -> Result<Socket, ReceiverError> {
    let addr = config.bind_addr;
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_recv_buffer_size(config.recv_buffer_size)?;
    socket.set_nonblocking(true)?;
    socket
        .bind(&addr.into())
        .map_err(|source| ReceiverError::Bind { addr, source })?;
    Ok(socket)
}
