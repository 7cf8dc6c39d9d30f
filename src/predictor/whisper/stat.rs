
/// Container for [`WhisperPredictor`] runtime stats.
///
/// [`WhisperPredictor`]: crate::predictor::WhisperPredictor
#[derive(Debug)]
pub struct WhisperStats {
    /// Hints accepted into the buffer
    pub inserts: usize,

    /// Entries pushed out of the buffer by newer hints
    pub evictions: usize,

    /// Lookups answered from a hint
    pub hint_predictions: usize,

    /// Hint predictions forced by the bias field
    pub bias_predictions: usize,

    /// Hint predictions computed from a formula
    pub formula_predictions: usize,

    /// Buffer hits whose history length has no evaluator yet
    pub declined: usize,

    /// Lookups handed to the fallback predictor
    pub fallback_lookups: usize,

    /// Commit-time comparisons where the hint agreed with the outcome
    pub hint_correct: usize,

    /// Commit-time comparisons where the hint disagreed with the outcome
    pub hint_incorrect: usize,
}
impl WhisperStats {
    pub fn new() -> Self {
        Self {
            inserts: 0,
            evictions: 0,
            hint_predictions: 0,
            bias_predictions: 0,
            formula_predictions: 0,
            declined: 0,
            fallback_lookups: 0,
            hint_correct: 0,
            hint_incorrect: 0,
        }
    }
}
