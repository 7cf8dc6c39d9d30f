//! Implementations of different branch predictors.

pub mod pht;
pub mod whisper;

pub use pht::*;
pub use whisper::*;

use std::any::Any;

use crate::branch::{BranchKind, Outcome};

/// A simulated thread identifier.
pub type ThreadId = u16;

/// Opaque per-branch state allocated by a predictor during `lookup` and
/// released by the same predictor on commit or squash.
///
/// The simulator threads this token through the prediction lifecycle
/// without looking inside it. A composing predictor that did not allocate
/// the token must pass it through untouched; only the predictor that
/// allocated it may downcast it.
pub type HistoryToken = Box<dyn Any>;

/// Interface between the simulator's fetch/commit machinery and a branch
/// predictor.
///
/// Calls arrive in simulated program order: `lookup` when a conditional
/// branch is fetched, `update_histories` once its speculative direction is
/// known, `update` when it commits, and `squash` when a misprediction rolls
/// it back.
pub trait BranchPredictor {
    fn name(&self) -> &'static str;

    /// Predict the direction of the conditional branch at `pc`.
    ///
    /// A predictor that needs to revisit this prediction later may park
    /// state in `bp_history`; whatever it leaves there comes back on the
    /// matching `update`/`squash` call.
    fn lookup(&mut self, tid: ThreadId, pc: usize,
        bp_history: &mut Option<HistoryToken>) -> Outcome;

    /// Record the speculative outcome of a branch in the predictor's
    /// history structures.
    fn update_histories(&mut self, tid: ThreadId, pc: usize, uncond: bool,
        taken: Outcome, target: usize, bp_history: &mut Option<HistoryToken>);

    /// Commit-time update with the architecturally resolved outcome.
    /// `squashed` is set when this update is re-driven by a pipeline flush.
    fn update(&mut self, tid: ThreadId, pc: usize, taken: Outcome,
        bp_history: &mut Option<HistoryToken>, squashed: bool,
        kind: BranchKind, target: usize);

    /// Roll back speculative state for a squashed branch.
    fn squash(&mut self, tid: ThreadId, bp_history: &mut Option<HistoryToken>);
}
