//! Implementations of a pattern history table (PHT).

use crate::branch::{BranchKind, Outcome};
use crate::predictor::*;

/// Configuration for building a [`PhtPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct PhtConfig {
    /// Number of table entries (must be a power of two).
    pub size: usize,
}
impl PhtConfig {
    /// Use this configuration to create a new [`PhtPredictor`].
    pub fn build(self) -> PhtPredictor {
        assert!(self.size.is_power_of_two());
        PhtPredictor {
            data: vec![DirState::WeakNot; self.size],
            cfg: self,
        }
    }
}

/// Two-bit direction state for one table entry.
///
/// A branch has to disagree with a strong state twice in a row before the
/// predicted direction flips, which keeps loop back-edges pinned taken
/// across their single not-taken exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DirState {
    StrongNot,
    WeakNot,
    WeakTaken,
    StrongTaken,
}
impl DirState {
    fn predict(self) -> Outcome {
        match self {
            Self::StrongNot | Self::WeakNot => Outcome::N,
            Self::WeakTaken | Self::StrongTaken => Outcome::T,
        }
    }

    fn train(self, outcome: Outcome) -> Self {
        match (self, outcome) {
            (Self::StrongNot, Outcome::N) => Self::StrongNot,
            (Self::StrongNot, Outcome::T) => Self::WeakNot,
            (Self::WeakNot, Outcome::N) => Self::StrongNot,
            (Self::WeakNot, Outcome::T) => Self::WeakTaken,
            (Self::WeakTaken, Outcome::N) => Self::WeakNot,
            (Self::WeakTaken, Outcome::T) => Self::StrongTaken,
            (Self::StrongTaken, Outcome::N) => Self::WeakTaken,
            (Self::StrongTaken, Outcome::T) => Self::StrongTaken,
        }
    }
}

/// State parked in `bp_history` between a [`PhtPredictor`] lookup and the
/// matching commit or squash.
#[derive(Clone, Copy, Debug)]
struct PhtHistory {
    index: usize,
}

/// A table of two-bit direction states indexed by the low bits of the
/// program counter. Serves as a conventional fallback behind more exotic
/// predictors.
pub struct PhtPredictor {
    cfg: PhtConfig,
    data: Vec<DirState>,
}
impl PhtPredictor {
    fn index_mask(&self) -> usize {
        self.cfg.size - 1
    }

    fn get_index(&self, pc: usize) -> usize {
        // Drop the low two bits; branch PCs are at least 4-byte spaced in
        // the workloads this table is sized for.
        (pc >> 2) & self.index_mask()
    }
}

impl BranchPredictor for PhtPredictor {
    fn name(&self) -> &'static str { "PhtPredictor" }

    fn lookup(&mut self, _tid: ThreadId, pc: usize,
        bp_history: &mut Option<HistoryToken>) -> Outcome
    {
        let index = self.get_index(pc);
        *bp_history = Some(Box::new(PhtHistory { index }));
        self.data[index].predict()
    }

    fn update_histories(&mut self, _tid: ThreadId, _pc: usize, _uncond: bool,
        _taken: Outcome, _target: usize,
        _bp_history: &mut Option<HistoryToken>)
    {
        // Nothing speculative to maintain: the table is indexed by PC
        // alone.
    }

    fn update(&mut self, _tid: ThreadId, pc: usize, taken: Outcome,
        bp_history: &mut Option<HistoryToken>, squashed: bool,
        _kind: BranchKind, _target: usize)
    {
        // Train the entry the lookup actually read, falling back to
        // re-indexing when no token was threaded through.
        let index = match bp_history.as_ref()
            .and_then(|h| h.downcast_ref::<PhtHistory>())
        {
            Some(hist) => hist.index,
            None => self.get_index(pc),
        };
        self.data[index] = self.data[index].train(taken);

        // The token is released once the branch commits; a squash-driven
        // update keeps it alive for the re-executed path.
        if !squashed {
            bp_history.take();
        }
    }

    fn squash(&mut self, _tid: ThreadId,
        bp_history: &mut Option<HistoryToken>)
    {
        bp_history.take();
    }
}
