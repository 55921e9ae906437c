//! Fixed-size header carried at the front of every datagram.

use bytes::BufMut;

use crate::byte_order::{field, read_wire_u16, read_wire_u32, write_wire_u16, write_wire_u32};

/// Encoded size of [`DatagramHeader`] in bytes.
pub const HEADER_LEN: usize = 24;

/// Protocol tag used by the camera firmware unless configured otherwise.
pub const DEFAULT_MAGIC: u32 = 0x1234_5678;

/// Largest UDP payload deliverable over IPv4.
pub const MAX_DATAGRAM_LEN: usize = 65_507;

/// Largest chunk payload that fits in one datagram after the header.
pub const MAX_PAYLOAD_LEN: usize = MAX_DATAGRAM_LEN - HEADER_LEN;

const MAGIC_AT: usize = 0;
const TOTAL_SIZE_AT: usize = 4;
const CHUNK_INDEX_AT: usize = 8;
const TOTAL_CHUNKS_AT: usize = 12;
const CHUNK_OFFSET_AT: usize = 16;
const CHUNK_DATA_SIZE_AT: usize = 20;
const CHECKSUM_AT: usize = 22;

/// Header describing the chunk carried by a single datagram.
///
/// `chunk_offset` and `checksum` are carried for wire compatibility with the
/// camera firmware; the receiver places chunks by index and stride alone.
///
/// # Examples
///
/// ```
/// use depthframe::datagram::{DEFAULT_MAGIC, DatagramHeader, HEADER_LEN};
///
/// let header = DatagramHeader {
///     magic: DEFAULT_MAGIC,
///     total_size: 1536,
///     chunk_index: 1,
///     total_chunks: 3,
///     chunk_offset: 512,
///     chunk_data_size: 512,
///     checksum: 0,
/// };
/// let bytes = header.encode();
/// assert_eq!(bytes.len(), HEADER_LEN);
/// assert_eq!(DatagramHeader::decode(&bytes), Some(header));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DatagramHeader {
    /// Protocol tag shared by sender and receiver.
    pub magic: u32,
    /// Byte length of the complete frame.
    pub total_size: u32,
    /// Zero-based position of this chunk within the frame.
    pub chunk_index: u32,
    /// Number of chunks composing the frame.
    pub total_chunks: u32,
    /// Sender-side byte offset of the chunk. Not used for placement.
    pub chunk_offset: u32,
    /// Declared payload length following the header.
    pub chunk_data_size: u16,
    /// Sender-side checksum. Not verified.
    pub checksum: u16,
}

impl DatagramHeader {
    /// Decode the header from the front of `buf`.
    ///
    /// Returns `None` when `buf` is shorter than [`HEADER_LEN`]. No field is
    /// validated here; see [`DatagramParser`](super::DatagramParser).
    #[must_use]
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        Some(Self {
            magic: read_wire_u32(field(buf, MAGIC_AT)?),
            total_size: read_wire_u32(field(buf, TOTAL_SIZE_AT)?),
            chunk_index: read_wire_u32(field(buf, CHUNK_INDEX_AT)?),
            total_chunks: read_wire_u32(field(buf, TOTAL_CHUNKS_AT)?),
            chunk_offset: read_wire_u32(field(buf, CHUNK_OFFSET_AT)?),
            chunk_data_size: read_wire_u16(field(buf, CHUNK_DATA_SIZE_AT)?),
            checksum: read_wire_u16(field(buf, CHECKSUM_AT)?),
        })
    }

    /// Encode the header into its 24-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0_u8; HEADER_LEN];
        let mut cursor = &mut out[..];
        self.write_to(&mut cursor);
        out
    }

    /// Append the wire form of the header to `dst`.
    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(&write_wire_u32(self.magic));
        dst.put_slice(&write_wire_u32(self.total_size));
        dst.put_slice(&write_wire_u32(self.chunk_index));
        dst.put_slice(&write_wire_u32(self.total_chunks));
        dst.put_slice(&write_wire_u32(self.chunk_offset));
        dst.put_slice(&write_wire_u16(self.chunk_data_size));
        dst.put_slice(&write_wire_u16(self.checksum));
    }
}
