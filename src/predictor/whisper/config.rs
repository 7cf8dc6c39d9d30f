
use crate::predictor::*;

/// Configuration for a [`WhisperPredictor`].
#[derive(Clone, Copy, Debug)]
pub struct WhisperConfig {
    /// Maximum number of hints held at once.
    pub hint_buffer_size: usize,
}
impl WhisperConfig {
    /// Use this configuration to create a new [`WhisperPredictor`]
    /// composed over the given fallback.
    pub fn build(self, fallback: Box<dyn BranchPredictor>)
        -> WhisperPredictor
    {
        WhisperPredictor::new(self, fallback)
    }
}
