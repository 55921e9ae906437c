//! Receiver configuration.
//!
//! [`ReceiverConfig`] gathers every knob the receive loop needs: where to
//! bind, which protocol tag to accept, how chunks map onto frame offsets, how
//! long an incomplete frame may linger and how much memory a single frame may
//! claim. Defaults match the camera firmware deployment.

use std::{
    net::{Ipv4Addr, SocketAddr},
    num::{NonZeroU32, NonZeroUsize},
    time::Duration,
};

use thiserror::Error;

use crate::{
    datagram::{DEFAULT_MAGIC, MAX_PAYLOAD_LEN},
    frame::CHUNK_STRIDE,
    receiver::BackoffConfig,
};

/// UDP port the camera streams to.
pub const DEFAULT_PORT: u16 = 9000;

/// How long an incomplete frame may stay in flight.
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(10);

/// Socket receive buffer requested from the operating system.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Largest frame the receiver will allocate for.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Largest chunk count the receiver will track for one frame.
pub const DEFAULT_MAX_CHUNKS: u32 = 65_536;

/// Errors reported by [`ReceiverConfig::validate`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero timeout would flush every frame before its second chunk.
    #[error("frame timeout must be non-zero")]
    ZeroTimeout,
    /// The stride cannot be carried by a single datagram.
    #[error("chunk stride {stride} exceeds the {max}-byte datagram payload limit")]
    StrideTooLarge { stride: usize, max: usize },
    /// The socket receive buffer size must be positive.
    #[error("receive buffer size must be non-zero")]
    ZeroRecvBuffer,
}

/// Settings for the frame receiver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use depthframe::config::ReceiverConfig;
///
/// let config = ReceiverConfig::default()
///     .with_bind_addr(([127, 0, 0, 1], 0).into())
///     .with_frame_timeout(Duration::from_millis(500));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.magic, 0x1234_5678);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Local address the UDP socket binds to.
    pub bind_addr: SocketAddr,
    /// Protocol tag accepted by the parser.
    pub magic: u32,
    /// Byte distance between consecutive chunk offsets.
    pub chunk_stride: NonZeroUsize,
    /// Maximum time an incomplete frame may stay in flight.
    pub frame_timeout: Duration,
    /// Frames declaring more bytes than this are discarded.
    pub max_frame_size: NonZeroU32,
    /// Frames declaring more chunks than this are discarded.
    pub max_chunks: NonZeroU32,
    /// Requested `SO_RCVBUF` size in bytes.
    pub recv_buffer_size: usize,
    /// Retry timing applied after socket receive failures.
    pub backoff: BackoffConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            magic: DEFAULT_MAGIC,
            chunk_stride: NonZeroUsize::new(CHUNK_STRIDE).unwrap_or(NonZeroUsize::MIN),
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
            max_frame_size: NonZeroU32::new(DEFAULT_MAX_FRAME_SIZE).unwrap_or(NonZeroU32::MAX),
            max_chunks: NonZeroU32::new(DEFAULT_MAX_CHUNKS).unwrap_or(NonZeroU32::MAX),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            backoff: BackoffConfig::default(),
        }
    }
}

impl ReceiverConfig {
    /// Set the local bind address.
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the accepted protocol tag.
    #[must_use]
    pub fn with_magic(mut self, magic: u32) -> Self {
        self.magic = magic;
        self
    }

    /// Set the chunk stride.
    #[must_use]
    pub fn with_chunk_stride(mut self, stride: NonZeroUsize) -> Self {
        self.chunk_stride = stride;
        self
    }

    /// Set the staleness timeout.
    #[must_use]
    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    /// Set the per-frame byte and chunk limits.
    #[must_use]
    pub fn with_limits(mut self, max_frame_size: NonZeroU32, max_chunks: NonZeroU32) -> Self {
        self.max_frame_size = max_frame_size;
        self.max_chunks = max_chunks;
        self
    }

    /// Set the requested socket receive buffer size.
    #[must_use]
    pub fn with_recv_buffer_size(mut self, size: usize) -> Self {
        self.recv_buffer_size = size;
        self
    }

    /// Set the receive-error back-off policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Check the configuration for values the receiver cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.chunk_stride.get() > MAX_PAYLOAD_LEN {
            return Err(ConfigError::StrideTooLarge {
                stride: self.chunk_stride.get(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        if self.recv_buffer_size == 0 {
            return Err(ConfigError::ZeroRecvBuffer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, time::Duration};

    use rstest::rstest;

    use super::{ConfigError, DEFAULT_PORT, ReceiverConfig};
    use crate::datagram::MAX_PAYLOAD_LEN;

    #[test]
    fn defaults_match_camera_deployment() {
        let config = ReceiverConfig::default();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.magic, 0x1234_5678);
        assert_eq!(config.chunk_stride.get(), 512);
        assert_eq!(config.frame_timeout, Duration::from_secs(10));
        assert_eq!(config.recv_buffer_size, 4 * 1024 * 1024);
        assert_eq!(config.validate(), Ok(()));
    }

    #[rstest]
    #[case::zero_timeout(
        ReceiverConfig::default().with_frame_timeout(Duration::ZERO),
        ConfigError::ZeroTimeout
    )]
    #[case::oversized_stride(
        ReceiverConfig::default()
            .with_chunk_stride(NonZeroUsize::new(MAX_PAYLOAD_LEN + 1).expect("non-zero")),
        ConfigError::StrideTooLarge { stride: MAX_PAYLOAD_LEN + 1, max: MAX_PAYLOAD_LEN }
    )]
    #[case::zero_recv_buffer(
        ReceiverConfig::default().with_recv_buffer_size(0),
        ConfigError::ZeroRecvBuffer
    )]
    fn validate_rejects_unusable_values(
        #[case] config: ReceiverConfig,
        #[case] expected: ConfigError,
    ) {
        assert_eq!(config.validate(), Err(expected));
    }
}
