//! Errors raised while setting up the frame receiver.

use std::{io, net::SocketAddr};

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the receiver from starting.
///
/// Failures while the loop is running (receive errors, malformed datagrams,
/// a slow consumer) are logged and absorbed rather than returned.
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// The configuration was rejected by [`ReceiverConfig::validate`](crate::config::ReceiverConfig::validate).
    #[error("invalid receiver configuration: {0}")]
    Config(#[from] ConfigError),
    /// Creating or binding the UDP socket failed.
    #[error("failed to bind UDP socket to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// Applying a socket option or registering with the runtime failed.
    #[error("socket setup failed: {0}")]
    Socket(#[from] io::Error),
}
