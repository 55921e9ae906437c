//! Per-datagram reassembly policy.
//!
//! [`ReceiveDriver`] decides, for every datagram and every timer tick, when a
//! frame is flushed to the consumer. It owns the parser and the assembler and
//! performs no I/O; the clock is always supplied by the caller so the policy
//! can be exercised deterministically.

use std::{
    num::NonZeroU32,
    time::{Duration, Instant},
};

use crate::{
    config::ReceiverConfig,
    datagram::{DatagramParser, Rejection},
    frame::{FrameAssembler, FrameOutcome, ReassembledFrame},
};

/// Granularity of the runtime's timer wheel.
const EXPIRY_TICK: Duration = Duration::from_millis(1);

/// What happened to a single datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The chunk was stored in the in-flight frame.
    Accepted,
    /// The parser discarded the datagram.
    Rejected(Rejection),
    /// The header declares a frame larger than the configured limits.
    OverLimit { total_size: u32, total_chunks: u32 },
    /// A non-initial chunk arrived while no frame was in flight.
    Orphaned,
}

impl Disposition {
    /// Label describing why the datagram was discarded, if it was.
    #[must_use]
    pub const fn discard_reason(self) -> Option<&'static str> {
        match self {
            Self::Accepted => None,
            Self::Rejected(rejection) => Some(rejection.as_str()),
            Self::OverLimit { .. } => Some("over_limit"),
            Self::Orphaned => Some("orphaned"),
        }
    }
}

/// Sequential reassembly state machine driven by a receive loop.
///
/// # Examples
///
/// ```
/// use std::time::Instant;
///
/// use depthframe::{
///     chunker::FrameChunker,
///     config::ReceiverConfig,
///     frame::FrameOutcome,
///     receiver::ReceiveDriver,
/// };
///
/// let mut driver = ReceiveDriver::new(&ReceiverConfig::default());
/// let frame = vec![42_u8; 1200];
/// let mut delivered = Vec::new();
/// for datagram in FrameChunker::default().chunk(&frame).expect("chunkable") {
///     driver.handle_datagram(&datagram, Instant::now(), |f| delivered.push(f));
/// }
/// assert_eq!(delivered.len(), 1);
/// assert_eq!(delivered[0].outcome(), FrameOutcome::Complete);
/// assert_eq!(delivered[0].payload(), frame.as_slice());
/// ```
#[derive(Debug)]
pub struct ReceiveDriver {
    parser: DatagramParser,
    assembler: FrameAssembler,
    frame_timeout: Duration,
    max_frame_size: NonZeroU32,
    max_chunks: NonZeroU32,
}

impl ReceiveDriver {
    /// Build a driver from the receiver configuration.
    #[must_use]
    pub fn new(config: &ReceiverConfig) -> Self {
        Self {
            parser: DatagramParser::new(config.magic),
            assembler: FrameAssembler::new(config.chunk_stride),
            frame_timeout: config.frame_timeout,
            max_frame_size: config.max_frame_size,
            max_chunks: config.max_chunks,
        }
    }

    /// Borrow the underlying assembler.
    #[must_use]
    pub const fn assembler(&self) -> &FrameAssembler { &self.assembler }

    /// Earliest instant at which [`poll_expired`](Self::poll_expired) flushes
    /// the in-flight frame, if one exists.
    ///
    /// A frame is stale only once its age exceeds the timeout, so the wake-up
    /// lands one timer tick past `started + timeout`.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.assembler.started_at().and_then(|started| {
            started
                .checked_add(self.frame_timeout)?
                .checked_add(EXPIRY_TICK)
        })
    }

    /// Flush the in-flight frame if it has been pending for longer than the
    /// configured timeout.
    ///
    /// Returns the partial frame when it holds any chunk. A stale frame with
    /// no chunks is discarded silently.
    pub fn poll_expired(&mut self, now: Instant) -> Option<ReassembledFrame> {
        if !self.assembler.is_in_progress()
            || self.assembler.elapsed_at(now) <= self.frame_timeout
        {
            return None;
        }
        if self.assembler.has_any_chunk() {
            self.assembler.finish(FrameOutcome::TimedOut)
        } else {
            self.assembler.reset();
            None
        }
    }

    /// Feed one received datagram through the policy.
    ///
    /// `deliver` is invoked for every frame that leaves the assembler, in
    /// order: a stale or superseded frame first, then the frame completed by
    /// this datagram. At most two frames are delivered per call.
    pub fn handle_datagram<F>(&mut self, datagram: &[u8], now: Instant, mut deliver: F) -> Disposition
    where
        F: FnMut(ReassembledFrame),
    {
        if let Some(frame) = self.poll_expired(now) {
            deliver(frame);
        }

        let chunk = match self.parser.try_parse(datagram) {
            Ok(chunk) => chunk,
            Err(rejection) => return Disposition::Rejected(rejection),
        };

        if chunk.total_size() > self.max_frame_size.get()
            || chunk.total_chunks() > self.max_chunks.get()
        {
            return Disposition::OverLimit {
                total_size: chunk.total_size(),
                total_chunks: chunk.total_chunks(),
            };
        }

        if chunk.chunk_index() == 0 {
            if self.assembler.has_any_chunk()
                && let Some(frame) = self.assembler.finish(FrameOutcome::Superseded)
            {
                deliver(frame);
            }
            self.assembler
                .start_new_at(chunk.total_chunks(), chunk.total_size(), now);
        }

        if !self.assembler.is_in_progress() {
            return Disposition::Orphaned;
        }

        self.assembler.add_chunk(chunk.chunk_index(), chunk.payload());

        if self.assembler.is_complete()
            && let Some(frame) = self.assembler.finish(FrameOutcome::Complete)
        {
            deliver(frame);
        }

        Disposition::Accepted
    }
}
