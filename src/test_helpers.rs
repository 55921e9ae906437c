#![cfg(test)]
//! Test-only helpers for building wire datagrams.

use crate::datagram::{DEFAULT_MAGIC, DatagramHeader};

/// Stride used by the camera firmware and by the tests below.
pub(crate) const TEST_STRIDE: u32 = 512;

/// Encode `header` followed by `payload` into one datagram.
pub(crate) fn datagram(header: DatagramHeader, payload: &[u8]) -> Vec<u8> {
    let mut out = header.encode().to_vec();
    out.extend_from_slice(payload);
    out
}

/// Build a well-formed datagram tagged with [`DEFAULT_MAGIC`].
pub(crate) fn chunk_datagram(
    total_size: u32,
    chunk_index: u32,
    total_chunks: u32,
    payload: &[u8],
) -> Vec<u8> {
    let header = DatagramHeader {
        magic: DEFAULT_MAGIC,
        total_size,
        chunk_index,
        total_chunks,
        chunk_offset: chunk_index.wrapping_mul(TEST_STRIDE),
        chunk_data_size: u16::try_from(payload.len()).expect("test payload fits in u16"),
        checksum: 0,
    };
    datagram(header, payload)
}
