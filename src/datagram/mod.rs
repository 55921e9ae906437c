//! Wire format of the depth-camera datagram stream.
//!
//! Every datagram starts with a fixed 24-byte little-endian
//! [`DatagramHeader`] followed by one chunk of frame payload. This module is
//! the only place that knows the layout: [`DatagramParser`] validates and
//! borrows chunks out of received datagrams, and [`DatagramHeader::encode`]
//! is used by the sender-side [`FrameChunker`](crate::chunker::FrameChunker).

pub mod header;
pub mod parser;

pub use header::{DEFAULT_MAGIC, DatagramHeader, HEADER_LEN, MAX_DATAGRAM_LEN, MAX_PAYLOAD_LEN};
pub use parser::{ChunkView, DatagramParser, Rejection};
