#![allow(unused_parens)]

pub mod branch;
pub mod hint;
pub mod formula;
pub mod history;
pub mod predictor;

pub use branch::*;
pub use hint::*;
pub use history::*;
pub use predictor::*;
