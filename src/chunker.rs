//! Outbound helper that splits frames into wire datagrams.
//!
//! [`FrameChunker`] is the sender-side inverse of the receive path: it cuts a
//! frame into stride-sized chunks and prefixes each with a
//! [`DatagramHeader`]. The receiver places chunk `i` at `i * stride`, so the
//! chunker must use the same stride the receiver is configured with.

use std::num::NonZeroUsize;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::{
    datagram::{DEFAULT_MAGIC, DatagramHeader, HEADER_LEN, MAX_PAYLOAD_LEN},
    frame::CHUNK_STRIDE,
};

/// Errors produced while chunking an outbound frame.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ChunkingError {
    /// The protocol cannot describe an empty frame.
    #[error("cannot chunk an empty frame")]
    EmptyFrame,
    /// The frame length does not fit the 32-bit `total_size` field.
    #[error("frame of {len} bytes exceeds the protocol limit of {max} bytes")]
    FrameTooLarge { len: usize, max: u32 },
    /// The stride cannot be carried by a single datagram.
    #[error("chunk stride {stride} exceeds the {max}-byte datagram payload limit")]
    StrideTooLarge { stride: usize, max: usize },
}

/// Splits frames into fixed-stride datagrams.
///
/// # Examples
///
/// ```
/// use depthframe::{chunker::FrameChunker, datagram::DatagramParser};
///
/// let datagrams = FrameChunker::default()
///     .chunk(&[7_u8; 1200])
///     .expect("frame fits");
/// assert_eq!(datagrams.len(), 3);
///
/// let last = DatagramParser::default()
///     .parse(&datagrams[2])
///     .expect("well-formed");
/// assert_eq!(last.chunk_index(), 2);
/// assert_eq!(last.payload().len(), 176);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameChunker {
    magic: u32,
    stride: NonZeroUsize,
}

impl Default for FrameChunker {
    fn default() -> Self {
        Self {
            magic: DEFAULT_MAGIC,
            stride: NonZeroUsize::new(CHUNK_STRIDE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl FrameChunker {
    /// Create a chunker tagging datagrams with `magic` and cutting frames
    /// every `stride` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::StrideTooLarge`] when a chunk of `stride`
    /// bytes would not fit in one datagram.
    pub fn new(magic: u32, stride: NonZeroUsize) -> Result<Self, ChunkingError> {
        if stride.get() > MAX_PAYLOAD_LEN {
            return Err(ChunkingError::StrideTooLarge {
                stride: stride.get(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        Ok(Self { magic, stride })
    }

    /// Byte length of every chunk except possibly the last.
    #[must_use]
    pub const fn stride(&self) -> NonZeroUsize { self.stride }

    /// Number of datagrams needed for a frame of `len` bytes.
    #[must_use]
    pub const fn chunk_count(&self, len: usize) -> usize { len.div_ceil(self.stride.get()) }

    /// Split `frame` into encoded datagrams, in chunk order.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::EmptyFrame`] for an empty frame and
    /// [`ChunkingError::FrameTooLarge`] when the frame length or its chunk
    /// offsets cannot be represented in the 32-bit header fields.
    pub fn chunk(&self, frame: &[u8]) -> Result<Vec<Bytes>, ChunkingError> {
        if frame.is_empty() {
            return Err(ChunkingError::EmptyFrame);
        }
        let too_large = ChunkingError::FrameTooLarge {
            len: frame.len(),
            max: u32::MAX,
        };
        let total_size = u32::try_from(frame.len()).map_err(|_| too_large)?;
        let total_chunks =
            u32::try_from(self.chunk_count(frame.len())).map_err(|_| too_large)?;

        frame
            .chunks(self.stride.get())
            .enumerate()
            .map(|(index, payload)| {
                let chunk_index = u32::try_from(index).map_err(|_| too_large)?;
                let chunk_offset = index
                    .checked_mul(self.stride.get())
                    .and_then(|offset| u32::try_from(offset).ok())
                    .ok_or(too_large)?;
                let chunk_data_size = u16::try_from(payload.len()).map_err(|_| {
                    ChunkingError::StrideTooLarge {
                        stride: self.stride.get(),
                        max: MAX_PAYLOAD_LEN,
                    }
                })?;
                let header = DatagramHeader {
                    magic: self.magic,
                    total_size,
                    chunk_index,
                    total_chunks,
                    chunk_offset,
                    chunk_data_size,
                    checksum: 0,
                };
                let mut datagram = BytesMut::with_capacity(HEADER_LEN + payload.len());
                header.write_to(&mut datagram);
                datagram.put_slice(payload);
                Ok(datagram.freeze())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use rstest::rstest;

    use super::{ChunkingError, FrameChunker};
    use crate::datagram::{DatagramHeader, DatagramParser, MAX_PAYLOAD_LEN};

    #[rstest]
    #[case::exact_multiple(1536, 3)]
    #[case::short_tail(1537, 4)]
    #[case::single_small(10, 1)]
    fn chunk_count_rounds_up(#[case] len: usize, #[case] expected: usize) {
        let datagrams = FrameChunker::default()
            .chunk(&vec![0_u8; len])
            .expect("frame fits");
        assert_eq!(datagrams.len(), expected);
        assert_eq!(FrameChunker::default().chunk_count(len), expected);
    }

    #[test]
    fn headers_describe_each_chunk() {
        let frame: Vec<u8> = (0..=255_u8).cycle().take(1100).collect();
        let datagrams = FrameChunker::new(0xfeed_f00d, NonZeroUsize::new(500).expect("non-zero"))
            .expect("valid stride")
            .chunk(&frame)
            .expect("frame fits");

        for (index, datagram) in datagrams.iter().enumerate() {
            let header = DatagramHeader::decode(datagram).expect("header present");
            assert_eq!(header.magic, 0xfeed_f00d);
            assert_eq!(header.total_size, 1100);
            assert_eq!(header.total_chunks, 3);
            assert_eq!(header.chunk_index as usize, index);
            assert_eq!(header.chunk_offset as usize, index * 500);
        }

        let tail = DatagramParser::new(0xfeed_f00d)
            .parse(&datagrams[2])
            .expect("well-formed");
        assert_eq!(tail.payload(), &frame[1000..]);
    }

    #[test]
    fn empty_frame_is_refused() {
        assert_eq!(
            FrameChunker::default().chunk(&[]),
            Err(ChunkingError::EmptyFrame)
        );
    }

    #[test]
    fn oversized_stride_is_refused() {
        let stride = NonZeroUsize::new(MAX_PAYLOAD_LEN + 1).expect("non-zero");
        assert_eq!(
            FrameChunker::new(0, stride),
            Err(ChunkingError::StrideTooLarge {
                stride: MAX_PAYLOAD_LEN + 1,
                max: MAX_PAYLOAD_LEN,
            })
        );
    }
}
