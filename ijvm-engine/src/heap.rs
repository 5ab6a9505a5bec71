//! The heap-array table: an indexed collection of variable-length integer
//! arrays, referenced from the operand stack and locals via
//! [`INDICATOR`](ijvm_isa::INDICATOR)-tagged words.

use ijvm_isa::{Word, INDICATOR};

/// a tagged reference to a heap array, as it appears on the operand
/// stack or in locals: `INDICATOR + slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapRef(pub Word);

impl HeapRef {
    /// interpret `word` as a heap reference if it falls in the tagged
    /// range, i.e. `word >= INDICATOR`. The collector and `IALOAD`/
    /// `IASTORE` both rely on this same identity test, so a
    /// program-computed integer that happens to land in this range is
    /// indistinguishable from a real reference — a known, inherited
    /// limitation (see `ijvm-engine`'s crate docs).
    pub fn from_word(word: Word) -> Option<Self> {
        (word >= INDICATOR).then_some(Self(word))
    }

    pub fn slot(self) -> usize {
        (self.0 - INDICATOR) as usize
    }

    pub fn tagged(slot: usize) -> Word {
        INDICATOR + slot as Word
    }
}

/// the heap proper: every array ever created, indexed by slot. A `None`
/// entry means the array at that slot has been freed by the collector;
/// slots are never reused, so an old `HeapRef` to a freed slot is always
/// detectable via [`HeapTable::is_freed`] rather than aliasing a newer
/// array.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeapTable {
    entries: Vec<Option<Vec<Word>>>,
}

impl HeapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// allocate a new zero-initialized array of `len` words and return
    /// its tagged reference.
    pub fn allocate(&mut self, len: usize) -> HeapRef {
        let slot = self.entries.len();
        self.entries.push(Some(vec![0; len]));
        HeapRef(HeapRef::tagged(slot))
    }

    pub fn get(&self, slot: usize) -> Option<&[Word]> {
        self.entries.get(slot).and_then(|e| e.as_deref())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut [Word]> {
        self.entries.get_mut(slot).and_then(|e| e.as_deref_mut())
    }

    pub fn is_freed(&self, slot: usize) -> bool {
        match self.entries.get(slot) {
            Some(Some(_)) => false,
            _ => true,
        }
    }

    pub fn free(&mut self, slot: usize) {
        if let Some(entry) = self.entries.get_mut(slot) {
            *entry = None;
        }
    }

    /// every slot ever minted, live or not — this crate's stand-in for
    /// the source's separate GC registry `G`. Because slots are never
    /// recycled, "every reference ever minted" and "every index that has
    /// ever existed in this table" are the same set, so a parallel `G`
    /// log would be redundant bookkeeping; see `DESIGN.md`.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &[Word])> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_deref().map(|arr| (i, arr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_tags_the_slot_with_indicator() {
        let mut h = HeapTable::new();
        let r = h.allocate(3);
        assert_eq!(r.0, INDICATOR);
        assert_eq!(h.get(0), Some([0, 0, 0].as_slice()));
    }

    #[test]
    fn freed_slots_stay_freed_and_keep_their_index() {
        let mut h = HeapTable::new();
        let a = h.allocate(1);
        let _b = h.allocate(1);
        h.free(a.slot());
        assert!(h.is_freed(a.slot()));
        assert_eq!(h.slot_count(), 2);
    }

    #[test]
    fn from_word_rejects_ordinary_integers() {
        assert!(HeapRef::from_word(41).is_none());
        assert!(HeapRef::from_word(INDICATOR).is_some());
    }
}
