//! Decoding for software-provided branch hints.
//!
//! A hint is a single 32-bit word carried by a distinguished instruction in
//! the simulated program. From the most-significant bit down it packs four
//! fields:
//!
//! ```text
//!   [31:28] history      geometric history-length selector
//!   [27:14] bool_formula read-once monotone Boolean formula selector
//!   [13:12] bias         00 = not-taken, 11 = taken, else use the formula
//!   [11:0]  pc_offset    unsigned byte offset from the hint to its branch
//! ```
//!
//! The formula selector is extracted as *15* bits starting at bit 14, so its
//! top bit overlaps the low bit of `history`. Encoders and decoders have to
//! agree on this overlap for hints to mean the same thing on both sides.

use crate::Outcome;

/// Geometric history lengths selected by [`Hint::history`].
/// Series: 8 * 1.3819^idx, rounded.
pub const HIST_LENGTHS: [usize; 16] = [
    8, 11, 15, 21, 29, 40, 56, 77,
    106, 147, 203, 281, 388, 536, 741, 1024,
];

/// A decoded hint word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hint {
    /// History-length selector (4 bits).
    pub history: u8,

    /// Formula selector (15-bit field in a 16-bit container; bit 15 is
    /// always clear after decoding).
    pub bool_formula: u16,

    /// Static bias (2 bits).
    pub bias: u8,

    /// Unsigned byte offset from the hint's own PC to the branch PC
    /// (12 bits).
    pub pc_offset: u16,
}

impl Hint {
    /// Decode a raw 32-bit hint word.
    pub fn from_u32(word: u32) -> Self {
        Self {
            history: ((word >> 28) & 0xf) as u8,
            bool_formula: ((word >> 14) & 0x7fff) as u16,
            bias: ((word >> 12) & 0b11) as u8,
            pc_offset: (word & 0xfff) as u16,
        }
    }

    /// Pack the four hint fields into a 32-bit word.
    ///
    /// The `bool_formula` field is masked to 15 bits; its top bit lands on
    /// bit 28 of the word, where it is OR'ed with the low bit of `history`.
    /// Callers that set both must keep them consistent.
    pub fn encode(history: u8, bool_formula: u16, bias: u8, pc_offset: u16)
        -> u32
    {
        (((history as u32) & 0xf) << 28)
            | (((bool_formula as u32) & 0x7fff) << 14)
            | (((bias as u32) & 0b11) << 12)
            | ((pc_offset as u32) & 0xfff)
    }

    /// The number of global-history bits this hint wants to look at.
    pub fn hist_length(&self) -> usize {
        assert!((self.history as usize) < HIST_LENGTHS.len());
        HIST_LENGTHS[self.history as usize]
    }

    /// Interpret the 2-bit bias field.
    pub fn bias(&self) -> HintBias {
        self.bias.into()
    }
}

/// Interpretation of the 2-bit bias field in a [`Hint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintBias {
    /// Always predict not-taken (bias `00`).
    NotTaken,
    /// Always predict taken (bias `11`).
    Taken,
    /// No static direction; evaluate the formula over global history.
    Dynamic,
}
impl From<u8> for HintBias {
    fn from(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::NotTaken,
            0b11 => Self::Taken,
            _ => Self::Dynamic,
        }
    }
}
impl HintBias {
    /// The forced outcome, if this bias forces one.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::NotTaken => Some(Outcome::N),
            Self::Taken => Some(Outcome::T),
            Self::Dynamic => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_extracts_all_fields() {
        let word = Hint::encode(0x3, 0x1abc, 0b10, 0x456);
        let hint = Hint::from_u32(word);
        assert_eq!(hint.history, 0x3);
        assert_eq!(hint.bool_formula, 0x1abc);
        assert_eq!(hint.bias, 0b10);
        assert_eq!(hint.pc_offset, 0x456);
    }

    #[test]
    fn decode_is_inverse_of_encode_on_masks() {
        // Oversized inputs are truncated to their field widths
        let word = Hint::encode(0xff, 0xffff, 0xff, 0xffff);
        let hint = Hint::from_u32(word);
        assert_eq!(hint.history, 0xf);
        assert_eq!(hint.bool_formula, 0x7fff);
        assert_eq!(hint.bias, 0b11);
        assert_eq!(hint.pc_offset, 0xfff);
    }

    #[test]
    fn formula_field_overlaps_low_history_bit() {
        // A formula selector with bit 14 set occupies bit 28 of the word,
        // which reads back as the low bit of the history selector.
        let word = Hint::encode(0, 0x4000, 0, 0);
        let hint = Hint::from_u32(word);
        assert_eq!(hint.history, 0x1);
        assert_eq!(hint.bool_formula, 0x4000);

        // ... and a history selector with its low bit set reads back as
        // bit 14 of the formula selector.
        let word = Hint::encode(0x1, 0, 0, 0);
        let hint = Hint::from_u32(word);
        assert_eq!(hint.history, 0x1);
        assert_eq!(hint.bool_formula, 0x4000);
    }

    #[test]
    fn formula_container_top_bit_is_always_clear() {
        for word in [0u32, !0u32, 0xdead_beef, 0x7fff << 14] {
            let hint = Hint::from_u32(word);
            assert_eq!(hint.bool_formula & 0x8000, 0);
        }
    }

    #[test]
    fn hist_length_table() {
        let expected = [
            8, 11, 15, 21, 29, 40, 56, 77,
            106, 147, 203, 281, 388, 536, 741, 1024,
        ];
        for (idx, len) in expected.iter().enumerate() {
            let hint = Hint::from_u32(Hint::encode(idx as u8, 0, 0, 0));
            assert_eq!(hint.hist_length(), *len);
        }
    }

    #[test]
    fn bias_mapping() {
        assert_eq!(HintBias::from(0b00), HintBias::NotTaken);
        assert_eq!(HintBias::from(0b01), HintBias::Dynamic);
        assert_eq!(HintBias::from(0b10), HintBias::Dynamic);
        assert_eq!(HintBias::from(0b11), HintBias::Taken);
        assert_eq!(HintBias::NotTaken.outcome(), Some(Outcome::N));
        assert_eq!(HintBias::Taken.outcome(), Some(Outcome::T));
        assert_eq!(HintBias::Dynamic.outcome(), None);
    }
}
