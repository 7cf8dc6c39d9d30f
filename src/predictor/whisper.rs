//! A software-assisted branch predictor driven by runtime hints.
//!
//! The cooperating program plants 32-bit hint words (see [`crate::hint`])
//! describing how particular branches should be predicted. Branches covered
//! by a live hint are answered here; everything else is delegated to a
//! conventional fallback predictor that this one wraps.

pub mod buffer;
pub mod config;
pub mod stat;

pub use buffer::*;
pub use config::*;
pub use stat::*;

use log::{debug, trace};

use crate::branch::{BranchKind, Outcome};
use crate::formula;
use crate::hint::{Hint, HintBias};
use crate::history::GlobalHistories;
use crate::predictor::{BranchPredictor, HistoryToken, ThreadId};

/// The hint-driven predictor, composed over a fallback.
pub struct WhisperPredictor {
    /// The configuration used to create this object
    pub cfg: WhisperConfig,

    pub stat: WhisperStats,

    /// Active hints in LRU order
    pub hint_buffer: HintBuffer,

    /// Per-thread global history of conditional-branch outcomes
    pub ghist: GlobalHistories,

    /// The predictor consulted for branches no hint covers
    fallback: Box<dyn BranchPredictor>,
}
impl WhisperPredictor {
    pub fn new(cfg: WhisperConfig, fallback: Box<dyn BranchPredictor>)
        -> Self
    {
        debug!("using whisper branch predictor over {}", fallback.name());
        Self {
            cfg,
            stat: WhisperStats::new(),
            hint_buffer: HintBuffer::new(cfg.hint_buffer_size),
            ghist: GlobalHistories::new(),
            fallback,
        }
    }

    /// Accept a hint word executed at `pc`. The branch it covers sits
    /// `pc_offset` bytes ahead of the hint; address arithmetic wraps.
    pub fn insert(&mut self, pc: usize, hint: u32) {
        let hint_obj = Hint::from_u32(hint);
        let br_pc = pc.wrapping_add(hint_obj.pc_offset as usize);
        self.stat.inserts += 1;
        self.stat.evictions += self.hint_buffer.insert(br_pc, hint);

        debug!(
            "inserted entry {{ pc: {:#010x}, hint: {:#010x} \
             {{ hist: {:#x}, bool_formula: {:#06x}, bias: {:#x}, \
             pc: {:#05x} }} }}",
            br_pc, hint, hint_obj.history, hint_obj.bool_formula,
            hint_obj.bias, hint_obj.pc_offset,
        );
    }

    /// Produce a direction from a hint, or decline.
    ///
    /// Declines when the hint has no static bias and selects a history
    /// length the formula evaluator does not cover.
    fn evaluate_hint(&mut self, tid: ThreadId, hint: &Hint)
        -> Option<Outcome>
    {
        match hint.bias() {
            HintBias::NotTaken | HintBias::Taken => hint.bias().outcome(),
            HintBias::Dynamic => {
                // Only the shortest geometric length has an evaluator;
                // longer windows fall through to the fallback.
                if hint.hist_length() != formula::HISTORY_BITS {
                    return None;
                }
                let window = self.ghist
                    .low_bits(tid, formula::HISTORY_BITS) as u8;
                Some(formula::evaluate(hint.bool_formula, window))
            },
        }
    }

    /// [`Self::evaluate_hint`], with the lookup-path accounting attached.
    fn predict_with_hint(&mut self, tid: ThreadId, pc: usize, hint: &Hint)
        -> Option<Outcome>
    {
        let outcome = self.evaluate_hint(tid, hint);
        match (hint.bias(), outcome) {
            (HintBias::NotTaken | HintBias::Taken, _) => {
                trace!("pc: {:#010x} -> bias: {:02b}", pc, hint.bias);
                self.stat.bias_predictions += 1;
            },
            (HintBias::Dynamic, Some(outcome)) => {
                trace!("pc: {:#010x} -> formula {:#06x}: {:?}",
                    pc, hint.bool_formula, outcome);
                self.stat.formula_predictions += 1;
            },
            (HintBias::Dynamic, None) => {
                trace!("pc: {:#010x} -> history length {} not implemented",
                    pc, hint.hist_length());
                self.stat.declined += 1;
            },
        }
        outcome
    }
}

impl BranchPredictor for WhisperPredictor {
    fn name(&self) -> &'static str { "WhisperPredictor" }

    fn lookup(&mut self, tid: ThreadId, pc: usize,
        bp_history: &mut Option<HistoryToken>) -> Outcome
    {
        if let Some(word) = self.hint_buffer.lookup(pc) {
            let hint = Hint::from_u32(word);
            if let Some(outcome) = self.predict_with_hint(tid, pc, &hint) {
                // The hint answered; `bp_history` stays empty since no
                // fallback state exists to revisit.
                self.stat.hint_predictions += 1;
                return outcome;
            }
        }

        self.stat.fallback_lookups += 1;
        self.fallback.lookup(tid, pc, bp_history)
    }

    fn update_histories(&mut self, tid: ThreadId, pc: usize, uncond: bool,
        taken: Outcome, target: usize, bp_history: &mut Option<HistoryToken>)
    {
        if !uncond {
            self.ghist.push(tid, taken);
        }

        // The fallback maintains its own speculative histories for the
        // branches it predicts.
        if !self.hint_buffer.contains(pc) {
            self.fallback.update_histories(tid, pc, uncond, taken, target,
                bp_history);
        }
    }

    fn update(&mut self, tid: ThreadId, pc: usize, taken: Outcome,
        bp_history: &mut Option<HistoryToken>, squashed: bool,
        kind: BranchKind, target: usize)
    {
        if !squashed {
            if let Some(word) = self.hint_buffer.peek(pc) {
                let hint = Hint::from_u32(word);
                if let Some(prediction) = self.evaluate_hint(tid, &hint) {
                    if prediction == taken {
                        self.stat.hint_correct += 1;
                    } else {
                        self.stat.hint_incorrect += 1;
                    }
                }
            }
        }

        if !self.hint_buffer.contains(pc) {
            self.fallback.update(tid, pc, taken, bp_history, squashed,
                kind, target);
        }
    }

    fn squash(&mut self, tid: ThreadId, bp_history: &mut Option<HistoryToken>)
    {
        // No private per-branch state of our own to roll back: predictions
        // made from hints leave the token empty, and the shared global
        // history register is deliberately not rewound. A present token
        // belongs to the fallback.
        if bp_history.is_some() {
            self.fallback.squash(tid, bp_history);
        }
    }
}
