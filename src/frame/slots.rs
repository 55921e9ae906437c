//! Fixed-size arena of chunk slots for one frame.

/// One slot per chunk index; `None` marks a chunk not yet received.
///
/// A received slot may hold no bytes at all when its chunk falls entirely
/// outside the frame.
#[derive(Debug)]
pub(super) struct ChunkSlots {
    slots: Vec<Option<Box<[u8]>>>,
    filled: usize,
}

impl ChunkSlots {
    pub(super) fn with_len(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots, filled: 0 }
    }

    pub(super) fn filled(&self) -> usize { self.filled }

    pub(super) fn is_full(&self) -> bool { self.filled == self.slots.len() }

    /// Store a copy of `payload` at `index`, replacing earlier content.
    ///
    /// Returns `false` when `index` is outside the arena.
    pub(super) fn insert(&mut self, index: usize, payload: &[u8]) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if slot.is_none() {
            self.filled += 1;
        }
        *slot = Some(payload.into());
        true
    }

    #[cfg(test)]
    pub(super) fn stored_bytes(&self) -> usize {
        self.slots.iter().flatten().map(|bytes| bytes.len()).sum()
    }

    /// Iterate over received chunks together with their index.
    pub(super) fn iter_filled(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|bytes| (index, bytes)))
    }
}
