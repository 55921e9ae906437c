#![doc(html_root_url = "https://docs.rs/depthframe/latest")]
//! Reassembly of depth-camera frames streamed over UDP.
//!
//! A camera splits every depth frame into fixed-stride chunks and sends each
//! one as a datagram with a small little-endian header. This crate parses
//! those datagrams, stitches the chunks back together and hands complete (or,
//! after a staleness timeout, partial) frames to a consumer over a bounded
//! channel.

pub mod byte_order;
pub mod chunker;
pub mod config;
pub mod datagram;
pub mod frame;
pub mod metrics;
pub mod rate;
pub mod receiver;
mod test_helpers;

pub use chunker::{ChunkingError, FrameChunker};
pub use config::{ConfigError, ReceiverConfig};
pub use datagram::{ChunkView, DatagramHeader, DatagramParser, Rejection};
pub use frame::{CHUNK_STRIDE, FrameAssembler, FrameOutcome, ReassembledFrame};
pub use receiver::{FrameReceiver, ReceiveDriver, ReceiveStats, ReceiverError};
