//! In-flight frame reassembly.
//!
//! [`FrameAssembler`] owns at most one partially received frame. Chunks are
//! stored by index as they arrive, in any order, and [`FrameAssembler::finish`]
//! lays them out at fixed-stride offsets into an owned [`ReassembledFrame`].
//! The assembler is transport-agnostic and never consults a clock on its own
//! unless asked; the `*_at` variants accept explicit readings for tests.

pub mod assembler;
pub mod reassembled;
mod slots;

pub use assembler::{CHUNK_STRIDE, FrameAssembler};
pub use reassembled::{FrameOutcome, ReassembledFrame};
