
use bitvec::prelude::*;
use std::collections::BTreeMap;

use crate::Outcome;
use crate::predictor::ThreadId;

/// Length of each per-thread global history register, in bits.
pub const GLOBAL_HISTORY_BITS: usize = 1024;

/// A shift register of recent branch outcomes.
///
/// The most recent outcome lives at index 0, and older outcomes are shifted
/// towards higher indices.
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* all of the bits and presents them in a format
// where the leftmost bit is the oldest (index n) and the rightmost bit is
// the most recent (index 0).
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    /// Record an outcome: shift every bit one position older, then place
    /// the new outcome at index 0. The oldest bit falls off the end.
    pub fn push(&mut self, outcome: Outcome) {
        self.data.shift_right(1);
        self.data.set(0, outcome.into());
    }

    /// Load the `n` most recent outcomes as an integer, with the most
    /// recent outcome in bit 0.
    pub fn low_bits(&self, n: usize) -> usize {
        assert!(n <= usize::BITS as usize && n <= self.len);
        self.data[0..n].load::<usize>()
    }
}


/// Per-thread global history of conditional-branch outcomes.
///
/// A thread's register springs into existence (all zeros) the first time it
/// is referenced, and lives as long as the predictor that owns this map.
pub struct GlobalHistories {
    data: BTreeMap<ThreadId, HistoryRegister>,
}
impl GlobalHistories {
    pub fn new() -> Self {
        Self { data: BTreeMap::new() }
    }

    /// Access the register for a thread, creating a zeroed one on first
    /// reference.
    pub fn register_mut(&mut self, tid: ThreadId) -> &mut HistoryRegister {
        self.data.entry(tid)
            .or_insert_with(|| HistoryRegister::new(GLOBAL_HISTORY_BITS))
    }

    /// Record a conditional-branch outcome for a thread.
    pub fn push(&mut self, tid: ThreadId, outcome: Outcome) {
        self.register_mut(tid).push(outcome);
    }

    /// The `n` most recent outcomes for a thread (most recent in bit 0).
    pub fn low_bits(&mut self, tid: ThreadId, n: usize) -> usize {
        self.register_mut(tid).low_bits(n)
    }
}

impl Default for GlobalHistories {
    fn default() -> Self { Self::new() }
}
