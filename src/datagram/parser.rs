//! Stateless validation of received datagrams.
//!
//! [`DatagramParser`] applies the discard rules of the protocol in a fixed
//! order and, when a datagram survives them, borrows its payload without
//! copying. Rejections carry a [`Rejection`] reason so the receive loop can
//! log and count them; they are never surfaced as errors to callers.

use thiserror::Error;

use super::{DEFAULT_MAGIC, DatagramHeader, HEADER_LEN};

/// Reason a datagram was discarded by [`DatagramParser::try_parse`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The datagram cannot hold a full header.
    #[error("datagram of {len} bytes is shorter than the {HEADER_LEN}-byte header")]
    Truncated { len: usize },
    /// The protocol tag does not match the configured magic.
    #[error("magic {found:#010x} does not match expected {expected:#010x}")]
    BadMagic { expected: u32, found: u32 },
    /// The header declares a frame without chunks or without bytes.
    #[error("header declares an empty frame: total_size={total_size}, total_chunks={total_chunks}")]
    EmptyFrame { total_size: u32, total_chunks: u32 },
    /// No payload bytes follow the header, or the header declares none.
    #[error("datagram carries no payload bytes")]
    EmptyPayload,
}

impl Rejection {
    /// Short stable label used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Truncated { .. } => "truncated",
            Self::BadMagic { .. } => "bad_magic",
            Self::EmptyFrame { .. } => "empty_frame",
            Self::EmptyPayload => "empty_payload",
        }
    }
}

/// A validated chunk borrowed from a received datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkView<'a> {
    total_size: u32,
    chunk_index: u32,
    total_chunks: u32,
    payload: &'a [u8],
}

impl<'a> ChunkView<'a> {
    /// Byte length of the frame this chunk belongs to. Never zero.
    #[must_use]
    pub const fn total_size(&self) -> u32 { self.total_size }

    /// Zero-based position of the chunk within its frame.
    #[must_use]
    pub const fn chunk_index(&self) -> u32 { self.chunk_index }

    /// Number of chunks in the frame. Never zero.
    #[must_use]
    pub const fn total_chunks(&self) -> u32 { self.total_chunks }

    /// Usable payload bytes. Never empty.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }
}

/// Decoder for the datagram wire format.
///
/// # Examples
///
/// ```
/// use depthframe::datagram::{DatagramHeader, DatagramParser};
///
/// let parser = DatagramParser::new(0x1234_5678);
/// let header = DatagramHeader {
///     magic: 0x1234_5678,
///     total_size: 4,
///     chunk_index: 0,
///     total_chunks: 1,
///     chunk_offset: 0,
///     chunk_data_size: 4,
///     checksum: 0,
/// };
/// let mut datagram = header.encode().to_vec();
/// datagram.extend_from_slice(&[1, 2, 3, 4]);
///
/// let chunk = parser.parse(&datagram).expect("valid datagram");
/// assert_eq!(chunk.payload(), &[1, 2, 3, 4]);
/// assert!(DatagramParser::new(0xdead_beef).parse(&datagram).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatagramParser {
    magic: u32,
}

impl Default for DatagramParser {
    fn default() -> Self { Self::new(DEFAULT_MAGIC) }
}

impl DatagramParser {
    /// Create a parser accepting datagrams tagged with `magic`.
    #[must_use]
    pub const fn new(magic: u32) -> Self { Self { magic } }

    /// The protocol tag this parser accepts.
    #[must_use]
    pub const fn magic(&self) -> u32 { self.magic }

    /// Decode `datagram`, returning `None` for anything that must be discarded.
    #[must_use]
    pub fn parse<'a>(&self, datagram: &'a [u8]) -> Option<ChunkView<'a>> {
        self.try_parse(datagram).ok()
    }

    /// Decode `datagram`, reporting why it was discarded.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] rule the datagram violates.
    pub fn try_parse<'a>(&self, datagram: &'a [u8]) -> Result<ChunkView<'a>, Rejection> {
        let header = DatagramHeader::decode(datagram).ok_or(Rejection::Truncated {
            len: datagram.len(),
        })?;

        if header.magic != self.magic {
            return Err(Rejection::BadMagic {
                expected: self.magic,
                found: header.magic,
            });
        }

        if header.total_chunks == 0 || header.total_size == 0 {
            return Err(Rejection::EmptyFrame {
                total_size: header.total_size,
                total_chunks: header.total_chunks,
            });
        }

        let available = datagram.len() - HEADER_LEN;
        let actual_len = usize::from(header.chunk_data_size).min(available);
        if actual_len == 0 {
            return Err(Rejection::EmptyPayload);
        }

        let payload = datagram
            .get(HEADER_LEN..HEADER_LEN + actual_len)
            .ok_or(Rejection::EmptyPayload)?;

        Ok(ChunkView {
            total_size: header.total_size,
            chunk_index: header.chunk_index,
            total_chunks: header.total_chunks,
            payload,
        })
    }
}
