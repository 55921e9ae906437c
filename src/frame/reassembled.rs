//! Owned output of the reassembly layer.

use bytes::Bytes;

/// Why a frame left the assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameOutcome {
    /// Every chunk index was received.
    Complete,
    /// The staleness timeout elapsed before all chunks arrived.
    TimedOut,
    /// A new frame started (chunk index 0) before this one completed.
    Superseded,
}

impl FrameOutcome {
    /// Short stable label used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::TimedOut => "timed_out",
            Self::Superseded => "superseded",
        }
    }
}

/// A reconstructed frame handed to the consumer.
///
/// The payload is always exactly the declared frame size. Regions whose chunks
/// never arrived are zero-filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledFrame {
    payload: Bytes,
    total_chunks: u32,
    chunks_received: u32,
    outcome: FrameOutcome,
}

impl ReassembledFrame {
    /// Construct a new [`ReassembledFrame`].
    #[must_use]
    pub fn new(
        payload: impl Into<Bytes>,
        total_chunks: u32,
        chunks_received: u32,
        outcome: FrameOutcome,
    ) -> Self {
        Self {
            payload: payload.into(),
            total_chunks,
            chunks_received,
            outcome,
        }
    }

    /// Borrow the frame bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { &self.payload }

    /// Consume the frame, returning the owned bytes.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }

    /// Number of chunks the sender declared.
    #[must_use]
    pub const fn total_chunks(&self) -> u32 { self.total_chunks }

    /// Number of distinct chunk indices that arrived.
    #[must_use]
    pub const fn chunks_received(&self) -> u32 { self.chunks_received }

    /// How the frame was closed.
    #[must_use]
    pub const fn outcome(&self) -> FrameOutcome { self.outcome }

    /// Whether some chunks are missing.
    #[must_use]
    pub const fn is_partial(&self) -> bool { self.chunks_received < self.total_chunks }
}
