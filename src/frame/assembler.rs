//! Single-frame accumulator with stride-based placement.

use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use super::{FrameOutcome, ReassembledFrame, slots::ChunkSlots};

/// Byte distance between consecutive chunk start offsets used by the camera
/// firmware.
pub const CHUNK_STRIDE: usize = 512;

const DEFAULT_STRIDE: NonZeroUsize = match NonZeroUsize::new(CHUNK_STRIDE) {
    Some(stride) => stride,
    None => panic!("chunk stride must be non-zero"),
};

#[derive(Debug)]
struct InFlightFrame {
    total_chunks: u32,
    total_size: u32,
    slots: ChunkSlots,
    started_at: Instant,
}

#[derive(Debug, Default)]
enum AssemblyState {
    #[default]
    Idle,
    Assembling(InFlightFrame),
}

/// Accumulates the chunks of one frame at a time.
///
/// The assembler is either idle or assembling exactly one frame. Chunks are
/// accepted in any order; duplicates overwrite earlier content and indices
/// outside the frame are ignored. Nothing here ever fails: callers observe
/// progress through [`is_complete`](Self::is_complete) and
/// [`has_any_chunk`](Self::has_any_chunk) and decide when to
/// [`finish`](Self::finish).
///
/// # Examples
///
/// ```
/// use depthframe::frame::{FrameAssembler, FrameOutcome};
///
/// let mut assembler = FrameAssembler::default();
/// assembler.start_new(2, 600);
/// assembler.add_chunk(1, &[2_u8; 88]);
/// assembler.add_chunk(0, &[1_u8; 512]);
/// assert!(assembler.is_complete());
///
/// let frame = assembler
///     .finish(FrameOutcome::Complete)
///     .expect("frame in progress");
/// assert_eq!(frame.payload().len(), 600);
/// assert_eq!(frame.payload()[511], 1);
/// assert_eq!(frame.payload()[512], 2);
/// assert!(!assembler.is_in_progress());
/// ```
#[derive(Debug)]
pub struct FrameAssembler {
    stride: NonZeroUsize,
    state: AssemblyState,
}

impl Default for FrameAssembler {
    fn default() -> Self { Self::new(DEFAULT_STRIDE) }
}

impl FrameAssembler {
    /// Create an idle assembler placing chunk `i` at byte `i * stride`.
    #[must_use]
    pub fn new(stride: NonZeroUsize) -> Self {
        Self {
            stride,
            state: AssemblyState::Idle,
        }
    }

    /// Byte distance between consecutive chunk offsets.
    #[must_use]
    pub const fn stride(&self) -> NonZeroUsize { self.stride }

    /// Begin a new frame using the current time.
    ///
    /// Any frame already in progress is discarded. When either argument is
    /// zero the assembler is simply reset.
    pub fn start_new(&mut self, total_chunks: u32, total_size: u32) {
        self.start_new_at(total_chunks, total_size, Instant::now());
    }

    /// Begin a new frame using an explicit clock reading.
    pub fn start_new_at(&mut self, total_chunks: u32, total_size: u32, now: Instant) {
        self.reset();
        if total_chunks == 0 || total_size == 0 {
            return;
        }
        let Ok(slot_count) = usize::try_from(total_chunks) else {
            return;
        };
        self.state = AssemblyState::Assembling(InFlightFrame {
            total_chunks,
            total_size,
            slots: ChunkSlots::with_len(slot_count),
            started_at: now,
        });
    }

    /// Store a copy of `payload` as chunk `chunk_index`.
    ///
    /// Ignored when idle, when the index is outside the frame or when the
    /// payload is empty. A repeated index replaces the earlier bytes. Only the
    /// bytes that land inside the declared frame size are kept; a chunk
    /// starting past the end is recorded as received with no content.
    pub fn add_chunk(&mut self, chunk_index: u32, payload: &[u8]) {
        let AssemblyState::Assembling(frame) = &mut self.state else {
            return;
        };
        if payload.is_empty() || chunk_index >= frame.total_chunks {
            return;
        }
        let Ok(index) = usize::try_from(chunk_index) else {
            return;
        };
        let room = usize::try_from(frame.total_size).map_or(0, |total| {
            index
                .checked_mul(self.stride.get())
                .map_or(0, |start| total.saturating_sub(start))
        });
        frame.slots.insert(index, &payload[..payload.len().min(room)]);
    }

    /// Whether a frame is being assembled.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self.state, AssemblyState::Assembling(_))
    }

    /// Whether every chunk of the in-progress frame has arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.frame().is_some_and(|frame| frame.slots.is_full())
    }

    /// Whether at least one chunk of the in-progress frame has arrived.
    #[must_use]
    pub fn has_any_chunk(&self) -> bool { self.chunks_received() > 0 }

    /// Number of distinct chunk indices received for the in-progress frame.
    #[must_use]
    pub fn chunks_received(&self) -> usize { self.frame().map_or(0, |frame| frame.slots.filled()) }

    /// Declared chunk count of the in-progress frame.
    #[must_use]
    pub fn total_chunks(&self) -> Option<u32> { self.frame().map(|frame| frame.total_chunks) }

    /// Declared byte size of the in-progress frame.
    #[must_use]
    pub fn total_size(&self) -> Option<u32> { self.frame().map(|frame| frame.total_size) }

    /// When the in-progress frame was started.
    #[must_use]
    pub fn started_at(&self) -> Option<Instant> { self.frame().map(|frame| frame.started_at) }

    /// Time since the in-progress frame was started, or zero when idle.
    #[must_use]
    pub fn elapsed(&self) -> Duration { self.elapsed_at(Instant::now()) }

    /// Time between the start of the in-progress frame and `now`.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.started_at()
            .map_or(Duration::ZERO, |started| now.saturating_duration_since(started))
    }

    /// Lay the received chunks out into a zero-filled buffer of the declared
    /// frame size.
    ///
    /// Chunk `i` lands at byte `i * stride`. Copies are clipped at the end of
    /// the frame and chunks starting beyond it are skipped. Returns `None`
    /// when idle.
    #[must_use]
    pub fn reconstruct(&self) -> Option<Vec<u8>> {
        let frame = self.frame()?;
        let total = usize::try_from(frame.total_size).ok()?;
        let mut buffer = vec![0_u8; total];

        for (index, chunk) in frame.slots.iter_filled() {
            let Some(start) = index.checked_mul(self.stride.get()) else {
                continue;
            };
            if start >= total {
                continue;
            }
            let len = chunk.len().min(total - start);
            buffer[start..start + len].copy_from_slice(&chunk[..len]);
        }

        Some(buffer)
    }

    /// Reconstruct the in-progress frame and return to idle.
    ///
    /// Returns `None` when idle.
    pub fn finish(&mut self, outcome: FrameOutcome) -> Option<ReassembledFrame> {
        let payload = self.reconstruct()?;
        let frame = self.frame()?;
        let total_chunks = frame.total_chunks;
        let chunks_received = u32::try_from(frame.slots.filled()).unwrap_or(total_chunks);
        self.reset();
        Some(ReassembledFrame::new(
            payload,
            total_chunks,
            chunks_received,
            outcome,
        ))
    }

    /// Drop any in-progress frame.
    pub fn reset(&mut self) { self.state = AssemblyState::Idle; }

    /// Bytes of chunk content held for the in-progress frame.
    #[cfg(test)]
    pub(crate) fn stored_bytes(&self) -> usize { self.frame().map_or(0, |frame| frame.slots.stored_bytes()) }

    fn frame(&self) -> Option<&InFlightFrame> {
        match &self.state {
            AssemblyState::Idle => None,
            AssemblyState::Assembling(frame) => Some(frame),
        }
    }
}
